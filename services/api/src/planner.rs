use chrono::{Local, NaiveDate};
use clap::Args;
use classroom_planner::config::AppConfig;
use classroom_planner::error::AppError;
use classroom_planner::workflows::enrollment::{
    classify, report::week_at_a_glance, AdmissionReport, ApplicantRequest, ClassPlacement,
    DailyFeedEntry, EnrollmentError, EnrollmentPlanner, Level, ProgramType, WeeklySchedule,
};
use classroom_planner::workflows::roster_import::{
    FteImporter, ImportSummary, RosterImport, RosterImporter,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AdmissionCheckArgs {
    /// Active roster export (CSV)
    #[arg(long)]
    pub(crate) active: PathBuf,
    /// Hold list export (CSV)
    #[arg(long)]
    pub(crate) hold: PathBuf,
    /// Optional staffing sheet with per-room FTE totals (CSV)
    #[arg(long)]
    pub(crate) fte: Option<PathBuf>,
    /// Applicant name
    #[arg(long)]
    pub(crate) name: String,
    /// Applicant date of birth (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) dob: NaiveDate,
    /// Requested days, e.g. "Mon, Wed, Fri"
    #[arg(long, value_parser = crate::infra::parse_schedule)]
    pub(crate) schedule: WeeklySchedule,
    /// Program type: fixed or flexible
    #[arg(long, value_parser = crate::infra::parse_program, default_value = "fixed")]
    pub(crate) program: ProgramType,
    /// Preferred joining date (defaults to the evaluation date)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) joining_date: Option<NaiveDate>,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct ForecastArgs {
    /// Active roster export (CSV)
    #[arg(long)]
    pub(crate) active: PathBuf,
    /// Hold list export (CSV)
    #[arg(long)]
    pub(crate) hold: PathBuf,
    /// Classroom to report on (1-4 or its name)
    #[arg(
        long,
        value_parser = crate::infra::parse_level,
        required_unless_present = "dob",
        conflicts_with = "dob"
    )]
    pub(crate) class: Option<Level>,
    /// Resolve the classroom from a date of birth instead (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) dob: Option<NaiveDate>,
    /// First day of the projection (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Override the configured horizon in months
    #[arg(long, value_parser = crate::infra::parse_horizon)]
    pub(crate) months: Option<u32>,
}

pub(crate) fn run_admission_check(args: AdmissionCheckArgs) -> Result<(), AppError> {
    let AdmissionCheckArgs {
        active,
        hold,
        fte,
        name,
        dob,
        schedule,
        program,
        joining_date,
        today,
    } = args;

    let config = AppConfig::load()?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let import = RosterImporter::from_paths(active, hold)?;

    let fte = match (fte, classify(dob, today)) {
        (Some(path), ClassPlacement::Class(level)) => Some(FteImporter::from_path(path, level)?),
        _ => None,
    };

    let request = ApplicantRequest {
        name,
        date_of_birth: dob,
        schedule,
        program_type: program,
        preferred_joining_date: joining_date,
    };

    let planner = EnrollmentPlanner::new(config.planner);
    let report = planner.evaluate(&import.input, &request, today, fte)?;

    render_import_summary(&import);
    render_admission_report(&report, today);
    Ok(())
}

pub(crate) fn run_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let ForecastArgs {
        active,
        hold,
        class,
        dob,
        start,
        months,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(months) = months {
        config.planner.horizon_months = months;
    }

    let start = start.unwrap_or_else(|| Local::now().date_naive());
    let target = resolve_class(class, dob, start)?;
    let import = RosterImporter::from_paths(active, hold)?;

    let planner = EnrollmentPlanner::new(config.planner);
    let feed = planner.forecast(&import.input, target, start)?;

    render_import_summary(&import);
    render_forecast(target, &feed);
    Ok(())
}

fn resolve_class(
    class: Option<Level>,
    dob: Option<NaiveDate>,
    as_of: NaiveDate,
) -> Result<Level, EnrollmentError> {
    if let Some(level) = class {
        return Ok(level);
    }

    let date_of_birth = dob.unwrap_or(as_of);
    match classify(date_of_birth, as_of) {
        ClassPlacement::Class(level) => Ok(level),
        placement => Err(EnrollmentError::Unclassifiable {
            name: format!("child born {date_of_birth}"),
            placement,
        }),
    }
}

fn render_import_summary(import: &RosterImport) {
    render_file_summary("Active roster", &import.active);
    render_file_summary("Hold list", &import.hold);
}

fn render_file_summary(label: &str, summary: &ImportSummary) {
    println!(
        "{}: {} loaded, {} skipped",
        label,
        summary.loaded,
        summary.skipped.len()
    );
    for row in &summary.skipped {
        println!("  - line {} ({}): {}", row.line, row.name, row.reason.label());
    }
}

pub(crate) fn render_admission_report(report: &AdmissionReport, today: NaiveDate) {
    println!("\nAdmission check for {} (evaluated {})", report.applicant, today);
    println!("Class: {}", report.class_label);
    println!(
        "Active students: {} of {} seats per day",
        report.active_count, report.class_capacity
    );
    println!("Students on hold: {}", report.hold_count);
    println!("Graduating within 60 days: {}", report.graduating_soon_count);
    println!("Admitted in the last 60 days: {}", report.recently_admitted_count);
    if let Some(fte) = report.fte {
        println!("FTE: {:.2}", fte);
    }

    println!("\nRequested date: {}", report.requested_date);
    println!("Available on requested date: {}", report.availability.label());
    match report.resolved_date {
        Some(date) => {
            println!("Next available date: {}", date);
            println!("Schedule: {}", report.resolved_schedule);
            println!("Wait: {} days", report.wait_days);
            if report.flexible_placement {
                println!("Note: placement relies on rearranging flexible students");
            }
        }
        None => {
            println!("Next available date: none before the child leaves this class");
            println!("Wait: {} days or more", report.wait_days);
        }
    }
}

pub(crate) fn render_forecast(target: Level, feed: &[DailyFeedEntry]) {
    let (Some(first), Some(last)) = (feed.first(), feed.last()) else {
        println!("Forecast for {}: no days in range", target);
        return;
    };

    println!("\nForecast for {} ({} -> {})", target, first.date, last.date);
    for entry in feed {
        let marker = if entry.at_capacity { " (full)" } else { "" };
        println!(
            "- {} {}: {}/{}{}",
            entry.date, entry.day_of_week, entry.occupancy, entry.capacity, marker
        );
        for sentence in entry.graduations.iter().chain(&entry.admissions) {
            println!("    {}", sentence);
        }
    }

    println!("\nWeek at a glance");
    for entry in week_at_a_glance(feed) {
        let attendance = if entry.attendance.is_empty() {
            "nobody".to_string()
        } else {
            entry.attendance.join(", ")
        };
        println!("- {}: {}", entry.day_of_week, attendance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn explicit_class_wins_over_birth_date() {
        let level = resolve_class(Some(Level::Infants), Some(date(2022, 1, 1)), date(2026, 10, 16))
            .expect("class resolves");
        assert_eq!(level, Level::Infants);
    }

    #[test]
    fn birth_date_resolves_class_on_start_day() {
        let level =
            resolve_class(None, Some(date(2025, 3, 1)), date(2026, 10, 16)).expect("class resolves");
        assert_eq!(level, Level::Wobblers);
    }

    #[test]
    fn graduated_birth_date_is_rejected() {
        match resolve_class(None, Some(date(2019, 1, 1)), date(2026, 10, 16)) {
            Err(EnrollmentError::Unclassifiable {
                placement: ClassPlacement::Graduated,
                ..
            }) => {}
            other => panic!("expected unclassifiable, got {other:?}"),
        }
    }
}

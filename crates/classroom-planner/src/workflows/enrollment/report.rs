use super::domain::{Level, WeeklySchedule};
use super::kpi::LevelSummary;
use super::search::AdmissionOutcome;
use super::simulation::DailyResult;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Wait reported when no admission date exists before the applicant ages out.
pub const UNRESOLVED_WAIT_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Yes,
    No,
}

impl Availability {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

/// Everything the enquiry screen shows about one applicant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdmissionReport {
    pub applicant: String,
    pub resolved_class: Level,
    pub class_label: &'static str,
    pub active_count: usize,
    pub hold_count: usize,
    pub class_capacity: u32,
    pub graduating_soon_count: usize,
    pub recently_admitted_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fte: Option<f64>,
    pub requested_date: NaiveDate,
    pub wait_days: i64,
    pub availability: Availability,
    pub resolved_date: Option<NaiveDate>,
    pub resolved_schedule: WeeklySchedule,
    pub flexible_placement: bool,
}

impl AdmissionReport {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        applicant: &str,
        level: Level,
        class_capacity: u32,
        summary: LevelSummary,
        requested_date: NaiveDate,
        requested_schedule: &WeeklySchedule,
        outcome: &AdmissionOutcome,
        fte: Option<f64>,
    ) -> Self {
        let slot = outcome.slot();
        let wait_days = slot
            .map(|slot| (slot.date - requested_date).num_days())
            .unwrap_or(UNRESOLVED_WAIT_DAYS);
        let availability = match slot {
            Some(slot) if slot.date <= requested_date => Availability::Yes,
            _ => Availability::No,
        };

        Self {
            applicant: applicant.to_owned(),
            resolved_class: level,
            class_label: level.label(),
            active_count: summary.active_count,
            hold_count: summary.hold_count,
            class_capacity,
            graduating_soon_count: summary.graduating_soon_count,
            recently_admitted_count: summary.recently_admitted_count,
            fte,
            requested_date,
            wait_days,
            availability,
            resolved_date: slot.map(|slot| slot.date),
            resolved_schedule: slot
                .map(|slot| slot.schedule.clone())
                .unwrap_or_else(|| requested_schedule.clone()),
            flexible_placement: slot.is_some_and(|slot| slot.flexible_placement),
        }
    }
}

/// One day of the forecast, narrowed to a single classroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyFeedEntry {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub occupancy: usize,
    pub capacity: u32,
    pub at_capacity: bool,
    pub graduations: Vec<String>,
    pub admissions: Vec<String>,
    pub attendance: Vec<String>,
}

impl DailyFeedEntry {
    pub fn from_result(result: &DailyResult, target: Level, capacity: u32) -> Self {
        let occupancy = result.occupancy_for(target);

        let graduations = result
            .graduations
            .iter()
            .filter_map(|event| {
                if event.from == target {
                    Some(format!(
                        "{} graduated from {} to {}",
                        event.name, event.from, event.to
                    ))
                } else if event.to == target {
                    Some(format!(
                        "{} graduated into {} from {}",
                        event.name, event.to, event.from
                    ))
                } else {
                    None
                }
            })
            .collect();

        let admissions = result
            .admissions
            .iter()
            .filter(|event| event.class == target)
            .map(|event| format!("{} was admitted to {}", event.name, event.class))
            .collect();

        Self {
            date: result.date,
            day_of_week: result.date.format("%A").to_string(),
            occupancy,
            capacity,
            at_capacity: occupancy >= capacity as usize,
            graduations,
            admissions,
            attendance: result.attendance_for(target).to_vec(),
        }
    }
}

pub fn daily_feed(results: &[DailyResult], target: Level, capacity: u32) -> Vec<DailyFeedEntry> {
    results
        .iter()
        .map(|result| DailyFeedEntry::from_result(result, target, capacity))
        .collect()
}

/// Weekday entries from the first seven days of the feed.
pub fn week_at_a_glance(feed: &[DailyFeedEntry]) -> Vec<&DailyFeedEntry> {
    feed.iter()
        .take(7)
        .filter(|entry| entry.date.weekday().num_days_from_monday() < 5)
        .collect()
}

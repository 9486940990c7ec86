use super::domain::{EnrollmentError, Level, RosterInput};
use super::kpi::summarize;
use super::report::{daily_feed, AdmissionReport, DailyFeedEntry};
use super::roster::Roster;
use super::search::AdmissionSearch;
use super::simulation::simulate;
use super::student::{Applicant, ApplicantRequest};
use crate::config::PlannerConfig;
use chrono::NaiveDate;
use tracing::info;

/// Entry point tying roster construction, KPIs, the admission search, and the
/// forecast together. Holds no roster state of its own.
#[derive(Debug, Clone)]
pub struct EnrollmentPlanner {
    config: PlannerConfig,
}

impl EnrollmentPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Evaluates an enquiry against the roster as of `today`.
    ///
    /// KPIs describe the roster as loaded; the search runs on a snapshot.
    pub fn evaluate(
        &self,
        input: &RosterInput,
        request: &ApplicantRequest,
        today: NaiveDate,
        fte: Option<f64>,
    ) -> Result<AdmissionReport, EnrollmentError> {
        let applicant = Applicant::new(request, today)?;
        let requested_date = request.preferred_joining_date.unwrap_or(today);
        let (roster, build) = Roster::from_records(self.config.capacity, input, today);

        let summary = summarize(&roster, applicant.level, today);
        let outcome =
            AdmissionSearch::new(&roster).find_admission_date(&applicant, requested_date);

        info!(
            applicant = %applicant.name,
            level = %applicant.level,
            skipped = build.skipped.len(),
            found = outcome.slot().is_some(),
            "admission evaluated"
        );

        Ok(AdmissionReport::new(
            &applicant.name,
            applicant.level,
            self.config.capacity.for_level(applicant.level),
            summary,
            requested_date,
            &applicant.schedule,
            &outcome,
            fte,
        ))
    }

    /// Projects the configured horizon from `start` and narrows it to `target`.
    pub fn forecast(
        &self,
        input: &RosterInput,
        target: Level,
        start: NaiveDate,
    ) -> Result<Vec<DailyFeedEntry>, EnrollmentError> {
        let results = simulate(start, self.config.horizon_months, &input.active, &input.hold)?;
        Ok(daily_feed(&results, target, self.config.capacity.for_level(target)))
    }
}

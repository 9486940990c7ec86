use super::classifier::has_aged_out;
use super::domain::{Level, ProgramType, WeeklySchedule};
use super::roster::Roster;
use super::student::Applicant;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

/// Days granted to reshuffle flexible students when the classroom is full.
pub const FLEXIBLE_PLACEMENT_DAYS: i64 = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdmissionSlot {
    pub date: NaiveDate,
    pub schedule: WeeklySchedule,
    pub flexible_placement: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdmissionOutcome {
    Found(AdmissionSlot),
    NotFound,
}

impl AdmissionOutcome {
    pub fn slot(&self) -> Option<&AdmissionSlot> {
        match self {
            Self::Found(slot) => Some(slot),
            Self::NotFound => None,
        }
    }
}

/// Forward search for the earliest date an applicant fits their classroom.
///
/// The search owns a snapshot of the roster and leaves it synchronized to the
/// last date it visited.
#[derive(Debug, Clone)]
pub struct AdmissionSearch {
    roster: Roster,
}

impl AdmissionSearch {
    pub fn new(roster: &Roster) -> Self {
        Self {
            roster: roster.snapshot(),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn into_roster(self) -> Roster {
        self.roster
    }

    pub fn find_admission_date(
        &mut self,
        applicant: &Applicant,
        preferred: NaiveDate,
    ) -> AdmissionOutcome {
        let level = applicant.level;
        let schedule = &applicant.schedule;

        self.roster.advance(preferred);
        if self.roster.can_place(schedule, level) {
            info!(applicant = %applicant.name, %level, date = %preferred, "seat available on preferred date");
            return found(preferred, schedule, false);
        }

        let has_flexible = self
            .roster
            .active_at(level)
            .any(|student| student.program_type == ProgramType::Flexible);
        if has_flexible {
            let date = preferred + Duration::days(FLEXIBLE_PLACEMENT_DAYS);
            info!(applicant = %applicant.name, %level, %date, "placing alongside flexible students");
            return found(date, schedule, true);
        }

        for date in self.candidate_dates(level, preferred) {
            if has_aged_out(applicant.date_of_birth, level, date) {
                debug!(applicant = %applicant.name, %date, "applicant ages out before a seat opens");
                break;
            }

            self.roster.advance(date);
            if self.roster.can_place(schedule, level) {
                info!(applicant = %applicant.name, %level, %date, "seat opens after promotions");
                return found(date, schedule, false);
            }
        }

        info!(applicant = %applicant.name, %level, "no admission date found");
        AdmissionOutcome::NotFound
    }

    /// Promotion dates on or after `preferred` for students in `level` and the
    /// two classrooms below it, ascending. Duplicates are kept.
    fn candidate_dates(&self, level: Level, preferred: NaiveDate) -> Vec<NaiveDate> {
        let levels = [Some(level), level.previous(), level.previous().and_then(Level::previous)];
        let roster = &self.roster;

        let mut dates: Vec<NaiveDate> = levels
            .into_iter()
            .flatten()
            .flat_map(move |source| roster.active_at(source).chain(roster.waitlisted_at(source)))
            .map(|student| student.promotion_date)
            .filter(|date| *date >= preferred)
            .collect();
        dates.sort();

        debug!(%level, candidates = dates.len(), "collected candidate admission dates");
        dates
    }
}

fn found(date: NaiveDate, schedule: &WeeklySchedule, flexible_placement: bool) -> AdmissionOutcome {
    AdmissionOutcome::Found(AdmissionSlot {
        date,
        schedule: schedule.clone(),
        flexible_placement,
    })
}

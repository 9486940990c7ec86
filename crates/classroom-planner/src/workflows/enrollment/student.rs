use super::classifier::{classify, promotion_date};
use super::domain::{
    ClassPlacement, EnrollmentError, EnrollmentStatus, HoldRecord, Level, ProgramType,
    RosterRecord, WeeklySchedule,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub level: Level,
    pub schedule: WeeklySchedule,
    pub program_type: ProgramType,
    pub start_date: NaiveDate,
    pub promotion_date: NaiveDate,
    pub status: EnrollmentStatus,
}

impl Student {
    /// Builds an enrolled student, placing them by age on `as_of`.
    pub fn enrolled(record: &RosterRecord, as_of: NaiveDate) -> Result<Self, EnrollmentError> {
        let level = placement_level(&record.name, record.date_of_birth, as_of)?;
        Ok(Self {
            name: record.name.clone(),
            date_of_birth: record.date_of_birth,
            level,
            schedule: record.schedule.clone(),
            program_type: record.program_type,
            start_date: record.start_date,
            promotion_date: promotion_date(record.date_of_birth, level),
            status: EnrollmentStatus::Active,
        })
    }

    /// Builds a held student whose start date is the requested admission date.
    pub fn held(record: &HoldRecord, as_of: NaiveDate) -> Result<Self, EnrollmentError> {
        let level = placement_level(&record.name, record.date_of_birth, as_of)?;
        Ok(Self {
            name: record.name.clone(),
            date_of_birth: record.date_of_birth,
            level,
            schedule: record.schedule.clone(),
            program_type: record.program_type,
            start_date: record.admission_date,
            promotion_date: promotion_date(record.date_of_birth, level),
            status: EnrollmentStatus::Waitlisted,
        })
    }

    pub fn is_existing(&self) -> bool {
        self.status == EnrollmentStatus::Active
    }

    pub(crate) fn promote_to(&mut self, next: Level) {
        self.level = next;
        self.promotion_date = promotion_date(self.date_of_birth, next);
    }

    pub(crate) fn waitlist_key(&self) -> (NaiveDate, NaiveDate, &str) {
        (self.start_date, self.date_of_birth, self.name.as_str())
    }
}

/// Applicant details as submitted by the enquiry form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantRequest {
    pub name: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub schedule: WeeklySchedule,
    #[serde(default)]
    pub program_type: ProgramType,
    #[serde(default)]
    pub preferred_joining_date: Option<NaiveDate>,
}

/// New applicant under evaluation; never part of a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Applicant {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub level: Level,
    pub schedule: WeeklySchedule,
    pub program_type: ProgramType,
}

impl Applicant {
    pub fn new(request: &ApplicantRequest, today: NaiveDate) -> Result<Self, EnrollmentError> {
        let level = placement_level(&request.name, request.date_of_birth, today)?;
        Ok(Self {
            name: request.name.clone(),
            date_of_birth: request.date_of_birth,
            level,
            schedule: request.schedule.clone(),
            program_type: request.program_type,
        })
    }
}

fn placement_level(
    name: &str,
    date_of_birth: NaiveDate,
    as_of: NaiveDate,
) -> Result<Level, EnrollmentError> {
    match classify(date_of_birth, as_of) {
        ClassPlacement::Class(level) => Ok(level),
        placement => Err(EnrollmentError::Unclassifiable {
            name: name.to_owned(),
            placement,
        }),
    }
}

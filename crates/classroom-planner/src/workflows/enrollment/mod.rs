//! Admission and promotion planning for age-banded classrooms.

pub mod classifier;
pub mod domain;
pub mod kpi;
mod planner;
pub mod report;
mod roster;
pub mod router;
mod search;
pub mod simulation;
mod student;

pub use classifier::{age_in_years, classify};
pub use domain::{
    ClassCapacity, ClassPlacement, EnrollmentError, EnrollmentStatus, HoldRecord, Level,
    ProgramType, RosterInput, RosterRecord, Weekday, WeeklySchedule,
};
pub use kpi::{summarize, LevelSummary};
pub use planner::EnrollmentPlanner;
pub use report::{daily_feed, week_at_a_glance, AdmissionReport, Availability, DailyFeedEntry};
pub use roster::{Roster, RosterBuildSummary, SkippedRecord};
pub use router::enrollment_router;
pub use search::{AdmissionOutcome, AdmissionSearch, AdmissionSlot};
pub use simulation::{simulate, AdmissionEvent, ClassTransition, DailyResult};
pub use student::{Applicant, ApplicantRequest, Student};

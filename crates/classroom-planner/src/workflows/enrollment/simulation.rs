use super::classifier::classify;
use super::domain::{ClassPlacement, EnrollmentError, HoldRecord, Level, RosterRecord, Weekday, WeeklySchedule};
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// A child moving into a new classroom on the day their age crosses a band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassTransition {
    pub name: String,
    pub from: Level,
    pub to: Level,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdmissionEvent {
    pub name: String,
    pub class: Level,
}

/// Projected state of every classroom on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyResult {
    pub date: NaiveDate,
    pub occupancy: BTreeMap<Level, usize>,
    pub graduations: Vec<ClassTransition>,
    pub admissions: Vec<AdmissionEvent>,
    pub attendance: BTreeMap<Level, Vec<String>>,
}

impl DailyResult {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            occupancy: Level::ordered().into_iter().map(|level| (level, 0)).collect(),
            graduations: Vec::new(),
            admissions: Vec::new(),
            attendance: Level::ordered()
                .into_iter()
                .map(|level| (level, Vec::new()))
                .collect(),
        }
    }

    pub fn occupancy_for(&self, level: Level) -> usize {
        self.occupancy.get(&level).copied().unwrap_or_default()
    }

    pub fn attendance_for(&self, level: Level) -> &[String] {
        self.attendance
            .get(&level)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

struct Child<'a> {
    name: &'a str,
    date_of_birth: NaiveDate,
    schedule: &'a WeeklySchedule,
}

impl<'a> From<&'a RosterRecord> for Child<'a> {
    fn from(record: &'a RosterRecord) -> Self {
        Self {
            name: &record.name,
            date_of_birth: record.date_of_birth,
            schedule: &record.schedule,
        }
    }
}

impl<'a> From<&'a HoldRecord> for Child<'a> {
    fn from(record: &'a HoldRecord) -> Self {
        Self {
            name: &record.name,
            date_of_birth: record.date_of_birth,
            schedule: &record.schedule,
        }
    }
}

/// Day-by-day projection over `[start, start + horizon_months]`.
///
/// Classrooms are derived from raw age every day and capacity is not enforced;
/// the figures show where children would sit, not whether they fit.
pub fn simulate(
    start: NaiveDate,
    horizon_months: u32,
    active: &[RosterRecord],
    hold: &[HoldRecord],
) -> Result<Vec<DailyResult>, EnrollmentError> {
    let end = start
        .checked_add_months(Months::new(horizon_months))
        .ok_or(EnrollmentError::HorizonOutOfRange {
            start,
            months: horizon_months,
        })?;

    let mut attendees: Vec<Child<'_>> = active.iter().map(Child::from).collect();
    let mut pending: Vec<&HoldRecord> = hold.iter().collect();
    let mut results = Vec::new();

    for date in start.iter_days().take_while(|date| *date <= end) {
        let mut day = DailyResult::empty(date);
        let weekday = Weekday::from_chrono(date.weekday());
        let yesterday = date.pred_opt();

        for child in &attendees {
            let ClassPlacement::Class(current) = classify(child.date_of_birth, date) else {
                continue;
            };

            if let Some(ClassPlacement::Class(previous)) =
                yesterday.map(|prior| classify(child.date_of_birth, prior))
            {
                if previous != current {
                    day.graduations.push(ClassTransition {
                        name: child.name.to_owned(),
                        from: previous,
                        to: current,
                    });
                }
            }

            if weekday.is_some_and(|weekday| child.schedule.contains(weekday)) {
                *day.occupancy.entry(current).or_default() += 1;
                day.attendance
                    .entry(current)
                    .or_default()
                    .push(child.name.to_owned());
            }
        }

        pending.retain(|record| {
            if record.admission_date < start || record.admission_date > date {
                return true;
            }
            let ClassPlacement::Class(class) = classify(record.date_of_birth, date) else {
                return true;
            };

            *day.occupancy.entry(class).or_default() += 1;
            day.admissions.push(AdmissionEvent {
                name: record.name.clone(),
                class,
            });
            attendees.push(Child::from(*record));
            false
        });

        results.push(day);
    }

    debug!(%start, %end, days = results.len(), "forward simulation complete");
    Ok(results)
}

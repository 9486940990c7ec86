use super::domain::{
    ClassCapacity, ClassPlacement, EnrollmentError, EnrollmentStatus, Level, RosterInput,
    Weekday, WeeklySchedule,
};
use super::student::Student;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, warn};

type LevelQueues = [VecDeque<Student>; 4];

/// Active students, per-classroom waitlists, and graduates for one centre.
///
/// The roster is a plain value: clone it (or call [`Roster::snapshot`]) before
/// exploring a what-if date so the baseline stays untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    capacity: ClassCapacity,
    active: Vec<Student>,
    hold_queues: LevelQueues,
    promoted_queues: LevelQueues,
    overflow_queues: LevelQueues,
    graduated: Vec<Student>,
}

/// Records dropped while building a roster because no classroom fits them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterBuildSummary {
    pub active_loaded: usize,
    pub hold_loaded: usize,
    pub skipped: Vec<SkippedRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub name: String,
    pub placement: ClassPlacement,
}

enum Departure {
    Waitlisted(Level),
    Graduated,
}

impl Roster {
    pub fn new(capacity: ClassCapacity) -> Self {
        Self {
            capacity,
            active: Vec::new(),
            hold_queues: Default::default(),
            promoted_queues: Default::default(),
            overflow_queues: Default::default(),
            graduated: Vec::new(),
        }
    }

    /// Places every record by age on `as_of`. Children outside every age band
    /// are skipped and reported in the summary.
    pub fn from_records(
        capacity: ClassCapacity,
        input: &RosterInput,
        as_of: NaiveDate,
    ) -> (Self, RosterBuildSummary) {
        let mut roster = Self::new(capacity);
        let mut summary = RosterBuildSummary::default();

        for record in &input.active {
            match Student::enrolled(record, as_of) {
                Ok(student) => {
                    roster.enroll(student);
                    summary.active_loaded += 1;
                }
                Err(err) => summary.skip(err),
            }
        }

        for record in &input.hold {
            match Student::held(record, as_of) {
                Ok(student) => {
                    roster.enqueue(student);
                    summary.hold_loaded += 1;
                }
                Err(err) => summary.skip(err),
            }
        }

        for level in Level::ordered() {
            roster.sort_queues(level);
        }

        debug!(
            %as_of,
            active = summary.active_loaded,
            hold = summary.hold_loaded,
            skipped = summary.skipped.len(),
            "roster constructed"
        );
        (roster, summary)
    }

    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    pub fn capacity(&self) -> ClassCapacity {
        self.capacity
    }

    pub fn enroll(&mut self, mut student: Student) {
        student.status = EnrollmentStatus::Active;
        self.active.push(student);
    }

    pub fn enqueue(&mut self, mut student: Student) {
        student.status = EnrollmentStatus::Waitlisted;
        self.hold_queues[student.level.index()].push_back(student);
    }

    pub fn active(&self) -> &[Student] {
        &self.active
    }

    pub fn active_at(&self, level: Level) -> impl Iterator<Item = &Student> + '_ {
        self.active
            .iter()
            .filter(move |student| student.level == level)
    }

    pub fn hold_queue(&self, level: Level) -> &VecDeque<Student> {
        &self.hold_queues[level.index()]
    }

    pub fn promoted_queue(&self, level: Level) -> &VecDeque<Student> {
        &self.promoted_queues[level.index()]
    }

    /// Students waiting at `level`, promoted-but-unplaced first.
    pub fn waitlisted_at(&self, level: Level) -> impl Iterator<Item = &Student> + '_ {
        self.promoted_queues[level.index()]
            .iter()
            .chain(self.hold_queues[level.index()].iter())
    }

    pub fn graduated(&self) -> &[Student] {
        &self.graduated
    }

    /// Number of active students in `level` who attend on `day`.
    pub fn attendance_on(&self, day: Weekday, level: Level) -> usize {
        self.active_at(level)
            .filter(|student| student.schedule.contains(day))
            .count()
    }

    pub fn weekday_occupancy(&self, level: Level) -> [(Weekday, usize); 5] {
        Weekday::ALL.map(|day| (day, self.attendance_on(day, level)))
    }

    /// True when every day in `schedule` still has a free seat in `level`.
    pub fn can_place(&self, schedule: &WeeklySchedule, level: Level) -> bool {
        let limit = self.capacity.for_level(level) as usize;
        schedule
            .days()
            .all(|day| self.attendance_on(day, level) < limit)
    }

    fn has_slack(&self, level: Level) -> bool {
        let limit = self.capacity.for_level(level) as usize;
        Weekday::ALL
            .into_iter()
            .all(|day| self.attendance_on(day, level) < limit)
    }

    /// Brings the roster forward to `as_of`: promotes students whose promotion
    /// date has passed, graduates Preschool leavers, and admits waitlisted
    /// students where seats allow.
    ///
    /// Levels are swept in ascending order until a sweep changes nothing, so
    /// calling `advance` again with the same date leaves the roster unchanged.
    pub fn advance(&mut self, as_of: NaiveDate) {
        let mut sweeps = 0usize;
        loop {
            sweeps += 1;
            let changes: usize = Level::ordered()
                .into_iter()
                .map(|level| self.sync_level(level, as_of))
                .sum();
            if changes == 0 {
                break;
            }
        }

        debug!(
            %as_of,
            sweeps,
            active = self.active.len(),
            graduated = self.graduated.len(),
            "roster advanced"
        );
    }

    fn sync_level(&mut self, level: Level, as_of: NaiveDate) -> usize {
        let promoted = self.promote(level, as_of);
        self.sort_queues(level);
        let admitted = self.admit_from_queues(level, as_of);
        promoted + admitted
    }

    fn promote(&mut self, level: Level, as_of: NaiveDate) -> usize {
        let due: Vec<usize> = self
            .active
            .iter()
            .enumerate()
            .filter(|(_, student)| student.level == level && student.promotion_date <= as_of)
            .map(|(index, _)| index)
            .collect();
        if due.is_empty() {
            return 0;
        }

        // Placed students move up in place; departures leave the active set
        // together once every due student has been decided.
        let mut departures: HashMap<usize, Departure> = HashMap::new();
        for &index in &due {
            match level.next() {
                Some(next) if self.can_place(&self.active[index].schedule, next) => {
                    self.active[index].promote_to(next);
                }
                Some(next) => {
                    departures.insert(index, Departure::Waitlisted(next));
                }
                None => {
                    departures.insert(index, Departure::Graduated);
                }
            }
        }

        if !departures.is_empty() {
            let previous = std::mem::take(&mut self.active);
            for (index, mut student) in previous.into_iter().enumerate() {
                match departures.remove(&index) {
                    None => self.active.push(student),
                    Some(Departure::Waitlisted(next)) => {
                        student.start_date = student.promotion_date;
                        student.promote_to(next);
                        student.status = EnrollmentStatus::Waitlisted;
                        debug!(name = %student.name, level = %next, "promoted student waitlisted");
                        self.promoted_queues[next.index()].push_back(student);
                    }
                    Some(Departure::Graduated) => {
                        student.status = EnrollmentStatus::Graduated;
                        debug!(name = %student.name, "student graduated");
                        self.graduated.push(student);
                    }
                }
            }
        }

        due.len()
    }

    fn sort_queues(&mut self, level: Level) {
        let slot = level.index();
        for queue in [
            &mut self.promoted_queues[slot],
            &mut self.hold_queues[slot],
        ] {
            queue
                .make_contiguous()
                .sort_by(|a, b| a.waitlist_key().cmp(&b.waitlist_key()));
        }
    }

    fn admit_from_queues(&mut self, level: Level, as_of: NaiveDate) -> usize {
        let slot = level.index();
        let mut admitted = 0;

        // Weekday slack is a coarse gate; each candidate is still checked
        // against its own schedule.
        while self.has_slack(level) {
            let Some(mut candidate) = self.promoted_queues[slot]
                .pop_front()
                .or_else(|| self.hold_queues[slot].pop_front())
            else {
                break;
            };

            if candidate.start_date <= as_of && self.can_place(&candidate.schedule, level) {
                candidate.status = EnrollmentStatus::Active;
                candidate.promote_to(level);
                debug!(name = %candidate.name, %level, "admitted from waitlist");
                self.active.push(candidate);
                admitted += 1;
            } else {
                self.overflow_queues[slot].push_back(candidate);
            }
        }

        let parked = std::mem::take(&mut self.overflow_queues[slot]);
        self.promoted_queues[slot].extend(parked);
        self.promoted_queues[slot]
            .make_contiguous()
            .sort_by(|a, b| a.waitlist_key().cmp(&b.waitlist_key()));

        admitted
    }
}

impl RosterBuildSummary {
    fn skip(&mut self, err: EnrollmentError) {
        if let EnrollmentError::Unclassifiable { name, placement } = err {
            warn!(%name, placement = placement.label(), "skipping record outside every age band");
            self.skipped.push(SkippedRecord { name, placement });
        }
    }
}

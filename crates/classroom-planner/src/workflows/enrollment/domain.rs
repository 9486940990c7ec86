use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Classroom levels ordered by the age band they serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Infants,
    Wobblers,
    OlderToddlers,
    Preschool,
}

impl Level {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Infants,
            Self::Wobblers,
            Self::OlderToddlers,
            Self::Preschool,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Infants => "Infants",
            Self::Wobblers => "Wobblers",
            Self::OlderToddlers => "Older Toddlers",
            Self::Preschool => "Preschool",
        }
    }

    /// 1-based classroom number.
    pub const fn number(self) -> u8 {
        match self {
            Self::Infants => 1,
            Self::Wobblers => 2,
            Self::OlderToddlers => 3,
            Self::Preschool => 4,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self.number() as usize - 1
    }

    /// Age in whole years at which a child leaves this classroom.
    pub const fn age_ceiling_years(self) -> u32 {
        match self {
            Self::Infants => 1,
            Self::Wobblers => 2,
            Self::OlderToddlers => 3,
            Self::Preschool => 5,
        }
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Infants => Some(Self::Wobblers),
            Self::Wobblers => Some(Self::OlderToddlers),
            Self::OlderToddlers => Some(Self::Preschool),
            Self::Preschool => None,
        }
    }

    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Infants => None,
            Self::Wobblers => Some(Self::Infants),
            Self::OlderToddlers => Some(Self::Wobblers),
            Self::Preschool => Some(Self::OlderToddlers),
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|level| level.number() == number)
    }

    /// Matches room names as they appear in attendance exports.
    pub fn from_label(value: &str) -> Option<Self> {
        let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
        Self::ordered()
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(&normalized))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of classifying a child by age on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassPlacement {
    Class(Level),
    Graduated,
    NotYetBorn,
}

impl ClassPlacement {
    pub const fn level(self) -> Option<Level> {
        match self {
            Self::Class(level) => Some(level),
            Self::Graduated | Self::NotYetBorn => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Class(level) => level.label(),
            Self::Graduated => "Graduated",
            Self::NotYetBorn => "Not Yet Born",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Self; 5] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
        }
    }

    /// Weekends have no classroom sessions.
    pub const fn from_chrono(day: chrono::Weekday) -> Option<Self> {
        match day {
            chrono::Weekday::Mon => Some(Self::Monday),
            chrono::Weekday::Tue => Some(Self::Tuesday),
            chrono::Weekday::Wed => Some(Self::Wednesday),
            chrono::Weekday::Thu => Some(Self::Thursday),
            chrono::Weekday::Fri => Some(Self::Friday),
            chrono::Weekday::Sat | chrono::Weekday::Sun => None,
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "m" | "mo" | "mon" | "monday" => Some(Self::Monday),
            "t" | "tu" | "tue" | "tues" | "tuesday" => Some(Self::Tuesday),
            "w" | "we" | "wed" | "wednesday" => Some(Self::Wednesday),
            "th" | "thu" | "thur" | "thurs" | "thursday" => Some(Self::Thursday),
            "f" | "fr" | "fri" | "friday" => Some(Self::Friday),
            _ => None,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Days of the week a child attends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklySchedule(BTreeSet<Weekday>);

impl WeeklySchedule {
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Self {
        Self(days.into_iter().collect())
    }

    /// Parses export notation such as `M (am,pm), W (am,pm), Th`.
    ///
    /// Session markers in parentheses are ignored and unknown tokens are
    /// dropped, so malformed input yields an empty schedule rather than an error.
    pub fn parse(raw: &str) -> Self {
        let mut depth = 0usize;
        let stripped: String = raw
            .chars()
            .filter(|&ch| match ch {
                '(' => {
                    depth += 1;
                    false
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    false
                }
                _ => depth == 0,
            })
            .collect();

        stripped
            .split(|ch: char| ch == ',' || ch == ';' || ch == '/' || ch.is_whitespace())
            .filter_map(Weekday::from_token)
            .collect()
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.iter().copied()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.days().map(Weekday::label).collect()
    }
}

impl FromIterator<Weekday> for WeeklySchedule {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for WeeklySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        f.write_str(&self.labels().join(", "))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramType {
    #[default]
    Fixed,
    Flexible,
}

impl ProgramType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fixed => "Fixed",
            Self::Flexible => "Flexible",
        }
    }

    /// Exports tag flexible enrolments with `FlexEd`.
    pub fn from_tags(tags: &str) -> Self {
        if tags.to_ascii_lowercase().contains("flexed") {
            Self::Flexible
        } else {
            Self::Fixed
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed" => Some(Self::Fixed),
            "flexible" | "flex" | "flexed" => Some(Self::Flexible),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Waitlisted,
    Graduated,
}

/// Maximum number of children per weekday in each classroom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCapacity([u32; 4]);

impl ClassCapacity {
    pub fn new(values: &[u32]) -> Result<Self, EnrollmentError> {
        let limits: [u32; 4] =
            values
                .try_into()
                .map_err(|_| EnrollmentError::InvalidCapacity {
                    expected: Level::ordered().len(),
                    found: values.len(),
                })?;
        Ok(Self(limits))
    }

    pub const fn for_level(&self, level: Level) -> u32 {
        self.0[level.index()]
    }

    pub fn values(&self) -> [u32; 4] {
        self.0
    }
}

impl Default for ClassCapacity {
    fn default() -> Self {
        Self([8, 8, 7, 20])
    }
}

/// Child already attending the centre, as supplied by the roster export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub name: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub schedule: WeeklySchedule,
    #[serde(default)]
    pub program_type: ProgramType,
    pub start_date: NaiveDate,
}

/// Child on hold, waiting for a seat from `admission_date` onwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldRecord {
    pub name: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub schedule: WeeklySchedule,
    #[serde(default)]
    pub program_type: ProgramType,
    pub admission_date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterInput {
    #[serde(default)]
    pub active: Vec<RosterRecord>,
    #[serde(default)]
    pub hold: Vec<HoldRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum EnrollmentError {
    #[error("expected {expected} classroom capacities, found {found}")]
    InvalidCapacity { expected: usize, found: usize },
    #[error("{name} cannot be placed in a classroom ({})", .placement.label())]
    Unclassifiable {
        name: String,
        placement: ClassPlacement,
    },
    #[error("a {months}-month horizon from {start} runs past the supported calendar")]
    HorizonOutOfRange { start: NaiveDate, months: u32 },
}

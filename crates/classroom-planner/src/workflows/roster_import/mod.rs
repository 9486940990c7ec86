mod normalizer;
mod parser;

use crate::workflows::enrollment::{HoldRecord, Level, RosterInput, RosterRecord};
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::warn;

use parser::RosterRow;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingHeader { column: &'static str },
}

impl fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::MissingHeader { column } => {
                write!(f, "roster export has no header row with a '{}' column", column)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::MissingHeader { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingBirthDate,
    MissingAdmissionDate,
}

impl SkipReason {
    pub const fn label(self) -> &'static str {
        match self {
            Self::MissingBirthDate => "missing or unreadable date of birth",
            Self::MissingAdmissionDate => "missing or unreadable admission date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: u64,
    pub name: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub loaded: usize,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone)]
pub struct Imported<T> {
    pub records: Vec<T>,
    pub summary: ImportSummary,
}

/// Both exports loaded together, with a summary per file.
#[derive(Debug, Clone)]
pub struct RosterImport {
    pub input: RosterInput,
    pub active: ImportSummary,
    pub hold: ImportSummary,
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_paths<A: AsRef<Path>, H: AsRef<Path>>(
        active: A,
        hold: H,
    ) -> Result<RosterImport, RosterImportError> {
        let active = std::fs::File::open(active)?;
        let hold = std::fs::File::open(hold)?;
        Self::from_reader(active, hold)
    }

    pub fn from_reader<A: Read, H: Read>(
        active: A,
        hold: H,
    ) -> Result<RosterImport, RosterImportError> {
        let active = Self::active_from_reader(active)?;
        let hold = Self::hold_from_reader(hold)?;

        Ok(RosterImport {
            input: RosterInput {
                active: active.records,
                hold: hold.records,
            },
            active: active.summary,
            hold: hold.summary,
        })
    }

    pub fn active_from_reader<R: Read>(
        reader: R,
    ) -> Result<Imported<RosterRecord>, RosterImportError> {
        collect(parser::parse_roster(reader)?, "active", |row, dob, start| {
            RosterRecord {
                name: row.name,
                date_of_birth: dob,
                schedule: row.schedule,
                program_type: row.program_type,
                start_date: start,
            }
        })
    }

    pub fn hold_from_reader<R: Read>(reader: R) -> Result<Imported<HoldRecord>, RosterImportError> {
        collect(parser::parse_roster(reader)?, "hold", |row, dob, admission| {
            HoldRecord {
                name: row.name,
                date_of_birth: dob,
                schedule: row.schedule,
                program_type: row.program_type,
                admission_date: admission,
            }
        })
    }
}

fn collect<T>(
    rows: Vec<RosterRow>,
    source: &'static str,
    build: impl Fn(RosterRow, chrono::NaiveDate, chrono::NaiveDate) -> T,
) -> Result<Imported<T>, RosterImportError> {
    let mut records = Vec::with_capacity(rows.len());
    let mut summary = ImportSummary::default();

    for row in rows {
        let reason = match (row.date_of_birth, row.admission_date) {
            (Some(dob), Some(admission)) => {
                records.push(build(row, dob, admission));
                summary.loaded += 1;
                continue;
            }
            (None, _) => SkipReason::MissingBirthDate,
            (Some(_), None) => SkipReason::MissingAdmissionDate,
        };

        warn!(source, line = row.line, name = %row.name, reason = reason.label(), "skipping roster row");
        summary.skipped.push(SkippedRow {
            line: row.line,
            name: row.name,
            reason,
        });
    }

    Ok(Imported { records, summary })
}

/// Reads the staffing sheet that reports full-time equivalents per room.
pub struct FteImporter;

impl FteImporter {
    pub fn from_path<P: AsRef<Path>>(path: P, level: Level) -> Result<f64, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::total_for(file, level)
    }

    /// Sums the `Total` column over rows whose `Room` names `level`.
    pub fn total_for<R: Read>(reader: R, level: Level) -> Result<f64, RosterImportError> {
        Ok(parser::parse_fte(reader)?
            .into_iter()
            .filter(|(room, _)| *room == level)
            .map(|(_, total)| total)
            .sum())
    }
}

use super::normalizer::{clean_text, display_name, header_cell};
use super::RosterImportError;
use crate::workflows::enrollment::{Level, ProgramType, WeeklySchedule};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(crate) const ROSTER_HEADER_MARKER: &str = "Dob";
pub(crate) const FTE_HEADER_MARKER: &str = "Room";

#[derive(Debug)]
pub(crate) struct RosterRow {
    pub(crate) line: u64,
    pub(crate) name: String,
    pub(crate) date_of_birth: Option<NaiveDate>,
    pub(crate) schedule: WeeklySchedule,
    pub(crate) program_type: ProgramType,
    pub(crate) admission_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct RosterCsvRow {
    #[serde(rename = "First Name", default)]
    first_name: String,
    #[serde(rename = "Last Name", default, deserialize_with = "empty_string_as_none")]
    last_name: Option<String>,
    #[serde(rename = "Dob", default, deserialize_with = "empty_string_as_none")]
    dob: Option<String>,
    #[serde(
        rename = "Time Schedule",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    time_schedule: Option<String>,
    #[serde(rename = "Tags", default, deserialize_with = "empty_string_as_none")]
    tags: Option<String>,
    #[serde(
        rename = "Admission Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    admission_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FteCsvRow {
    #[serde(rename = "Room", default, deserialize_with = "empty_string_as_none")]
    room: Option<String>,
    #[serde(rename = "Total", default, deserialize_with = "empty_string_as_none")]
    total: Option<String>,
}

pub(crate) fn parse_roster<R: Read>(reader: R) -> Result<Vec<RosterRow>, RosterImportError> {
    let text = read_text(reader)?;
    let Some((preamble_lines, body)) = locate_header(&text, ROSTER_HEADER_MARKER)? else {
        return Ok(Vec::new());
    };

    let mut csv_reader = csv_reader(body.as_bytes());
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = preamble_lines + record.position().map(|pos| pos.line()).unwrap_or_default();
        let row: RosterCsvRow = record.deserialize(Some(&headers))?;

        rows.push(RosterRow {
            line,
            name: display_name(&row.first_name, row.last_name.as_deref()),
            date_of_birth: row.dob.as_deref().and_then(parse_date),
            schedule: row
                .time_schedule
                .as_deref()
                .map(WeeklySchedule::parse)
                .unwrap_or_default(),
            program_type: row
                .tags
                .as_deref()
                .map(ProgramType::from_tags)
                .unwrap_or_default(),
            admission_date: row.admission_date.as_deref().and_then(parse_date),
        });
    }

    Ok(rows)
}

pub(crate) fn parse_fte<R: Read>(reader: R) -> Result<Vec<(Level, f64)>, RosterImportError> {
    let text = read_text(reader)?;
    let Some((_, body)) = locate_header(&text, FTE_HEADER_MARKER)? else {
        return Ok(Vec::new());
    };

    let mut csv_reader = csv_reader(body.as_bytes());
    let mut totals = Vec::new();

    for record in csv_reader.deserialize::<FteCsvRow>() {
        let row = record?;
        let level = row.room.as_deref().and_then(Level::from_label);
        let total = row
            .total
            .as_deref()
            .and_then(|value| value.trim().parse::<f64>().ok());

        if let (Some(level), Some(total)) = (level, total) {
            totals.push((level, total));
        }
    }

    Ok(totals)
}

fn read_text<R: Read>(mut reader: R) -> Result<String, RosterImportError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

fn csv_reader(body: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body)
}

/// Finds the header row carrying `marker` and returns the number of
/// preamble lines above it together with the text from the header onwards.
/// Blank input yields `None`.
fn locate_header<'a>(
    text: &'a str,
    marker: &'static str,
) -> Result<Option<(u64, &'a str)>, RosterImportError> {
    let text = text.trim_start_matches('\u{feff}');
    if text.trim().is_empty() {
        return Ok(None);
    }

    let mut offset = 0;
    for (index, line) in text.split_inclusive('\n').enumerate() {
        if line.split(',').any(|cell| header_cell(cell) == marker) {
            return Ok(Some((index as u64, &text[offset..])));
        }
        offset += line.len();
    }

    Err(RosterImportError::MissingHeader { column: marker })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| clean_text(&value))
        .filter(|value| !value.is_empty()))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }

    NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").ok()
}

#[cfg(test)]
pub(crate) fn parse_date_for_tests(value: &str) -> Option<NaiveDate> {
    parse_date(value)
}

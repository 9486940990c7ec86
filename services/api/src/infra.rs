use chrono::NaiveDate;
use classroom_planner::config;
use classroom_planner::workflows::enrollment::{Level, ProgramType, WeeklySchedule};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_schedule(raw: &str) -> Result<WeeklySchedule, String> {
    let schedule = WeeklySchedule::parse(raw);
    if schedule.is_empty() {
        Err(format!("'{raw}' does not name any weekday (use e.g. \"Mon, Wed\")"))
    } else {
        Ok(schedule)
    }
}

pub(crate) fn parse_level(raw: &str) -> Result<Level, String> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .and_then(Level::from_number)
        .or_else(|| Level::from_label(&raw.replace(['-', '_'], " ")))
        .ok_or_else(|| {
            format!("unknown class '{raw}' (expected 1-4, Infants, Wobblers, Older Toddlers or Preschool)")
        })
}

pub(crate) fn parse_horizon(raw: &str) -> Result<u32, String> {
    config::parse_horizon(raw).map_err(|err| err.to_string())
}

pub(crate) fn parse_program(raw: &str) -> Result<ProgramType, String> {
    ProgramType::from_label(raw).ok_or_else(|| format!("unknown program '{raw}' (expected fixed or flexible)"))
}

use super::domain::Level;
use super::roster::Roster;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Window used for both "graduating soon" and "recently admitted".
pub const KPI_WINDOW_DAYS: i64 = 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelSummary {
    pub active_count: usize,
    pub hold_count: usize,
    pub graduating_soon_count: usize,
    pub recently_admitted_count: usize,
}

pub fn summarize(roster: &Roster, level: Level, today: NaiveDate) -> LevelSummary {
    let window = Duration::days(KPI_WINDOW_DAYS);
    let soon = today + window;
    let recent = today - window;

    roster.active_at(level).fold(
        LevelSummary {
            hold_count: roster.hold_queue(level).len(),
            ..LevelSummary::default()
        },
        |mut summary, student| {
            summary.active_count += 1;
            if student.promotion_date <= soon {
                summary.graduating_soon_count += 1;
            }
            if (recent..=today).contains(&student.start_date) {
                summary.recently_admitted_count += 1;
            }
            summary
        },
    )
}

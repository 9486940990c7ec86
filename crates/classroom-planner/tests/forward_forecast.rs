//! Day-by-day projections: class transitions, hold admissions and the per-class feed.

use chrono::{Duration, NaiveDate};
use classroom_planner::config::PlannerConfig;
use classroom_planner::workflows::enrollment::{
    report::week_at_a_glance, simulate, ClassTransition, EnrollmentPlanner, HoldRecord, Level,
    ProgramType, RosterInput, RosterRecord, Weekday, WeeklySchedule,
};

/// A Monday.
fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

fn weekdays() -> WeeklySchedule {
    WeeklySchedule::new(Weekday::ALL)
}

fn active(name: &str, date_of_birth: NaiveDate) -> RosterRecord {
    RosterRecord {
        name: name.to_string(),
        date_of_birth,
        schedule: weekdays(),
        program_type: ProgramType::Fixed,
        start_date: start() - Duration::days(90),
    }
}

#[test]
fn child_turning_one_moves_rooms_on_the_boundary_day() {
    // 362 days old on Monday; 366 days (the first day past one year) on Friday.
    let roster = vec![active("Ada", start() - Duration::days(362))];
    let results = simulate(start(), 1, &roster, &[]).expect("horizon in range");

    let thursday = &results[3];
    assert_eq!(thursday.occupancy_for(Level::Infants), 1);
    assert_eq!(thursday.occupancy_for(Level::Wobblers), 0);
    assert!(thursday.graduations.is_empty());

    let friday = &results[4];
    assert_eq!(
        friday.graduations,
        vec![ClassTransition {
            name: "Ada".to_string(),
            from: Level::Infants,
            to: Level::Wobblers,
        }]
    );
    assert_eq!(friday.occupancy_for(Level::Infants), 0);
    assert_eq!(friday.occupancy_for(Level::Wobblers), 1);
    assert_eq!(friday.attendance_for(Level::Wobblers), ["Ada".to_string()]);

    let transitions: usize = results.iter().map(|day| day.graduations.len()).sum();
    assert_eq!(transitions, 1);
}

#[test]
fn children_leaving_preschool_are_not_reported_as_transitions() {
    let five_next_week = NaiveDate::from_ymd_opt(2021, 10, 22).expect("valid date");
    let results = simulate(start(), 1, &[active("Ben", five_next_week)], &[])
        .expect("horizon in range");

    assert!(results.iter().all(|day| day.graduations.is_empty()));
    assert_eq!(results[0].occupancy_for(Level::Preschool), 1);
    assert!(results[7..]
        .iter()
        .all(|day| day.occupancy_for(Level::Preschool) == 0));
}

#[test]
fn hold_children_join_from_their_admission_date() {
    let hold = vec![HoldRecord {
        name: "Cleo".to_string(),
        date_of_birth: start() - Duration::days(500),
        schedule: WeeklySchedule::new([Weekday::Wednesday]),
        program_type: ProgramType::Fixed,
        admission_date: start() + Duration::days(1),
    }];
    let results = simulate(start(), 1, &[], &hold).expect("horizon in range");

    assert_eq!(results[0].occupancy_for(Level::Wobblers), 0);
    assert_eq!(results[1].admissions.len(), 1);
    assert_eq!(results[1].occupancy_for(Level::Wobblers), 1);
    // Tuesday admission, then Wednesday attendance only.
    assert_eq!(results[2].occupancy_for(Level::Wobblers), 1);
    assert_eq!(results[3].occupancy_for(Level::Wobblers), 0);
    assert!(results[2..].iter().all(|day| day.admissions.is_empty()));
}

#[test]
fn planner_forecast_narrows_feed_to_target_class() {
    let planner = EnrollmentPlanner::new(PlannerConfig {
        horizon_months: 1,
        ..PlannerConfig::default()
    });
    let input = RosterInput {
        active: vec![
            active("Ada", start() - Duration::days(362)),
            active("Dex", start() - Duration::days(100)),
        ],
        hold: vec![HoldRecord {
            name: "Eli".to_string(),
            date_of_birth: start() - Duration::days(60),
            schedule: weekdays(),
            program_type: ProgramType::Fixed,
            admission_date: start() + Duration::days(2),
        }],
    };

    let feed = planner
        .forecast(&input, Level::Infants, start())
        .expect("forecast succeeds");
    assert_eq!(feed.len(), 32);
    assert_eq!(feed[0].day_of_week, "Monday");
    assert_eq!(feed[0].capacity, 8);
    assert_eq!(feed[0].occupancy, 2);
    assert_eq!(feed[2].admissions, vec!["Eli was admitted to Infants".to_string()]);
    assert_eq!(feed[2].occupancy, 3);
    assert_eq!(
        feed[4].graduations,
        vec!["Ada graduated from Infants to Wobblers".to_string()]
    );
    assert_eq!(feed[4].occupancy, 2);
    assert!(!feed[4].at_capacity);

    let glance = week_at_a_glance(&feed);
    assert_eq!(glance.len(), 5);
    assert!(glance.iter().all(|entry| entry.day_of_week != "Saturday"));
}

//! Admission scenarios driven through the planner facade and the HTTP router.
//!
//! Every scenario fixes `today` so the age bands and promotion dates stay stable.

mod common {
    use chrono::{Duration, NaiveDate};
    use classroom_planner::config::PlannerConfig;
    use classroom_planner::workflows::enrollment::{
        ApplicantRequest, ClassCapacity, EnrollmentPlanner, ProgramType, RosterRecord, Weekday,
        WeeklySchedule,
    };

    pub(super) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date")
    }

    pub(super) fn days_ago(days: i64) -> NaiveDate {
        today() - Duration::days(days)
    }

    pub(super) fn mon_wed() -> WeeklySchedule {
        WeeklySchedule::new([Weekday::Monday, Weekday::Wednesday])
    }

    pub(super) fn monday() -> WeeklySchedule {
        WeeklySchedule::new([Weekday::Monday])
    }

    pub(super) fn friday() -> WeeklySchedule {
        WeeklySchedule::new([Weekday::Friday])
    }

    pub(super) fn student(
        name: &str,
        age_days: i64,
        schedule: WeeklySchedule,
        program_type: ProgramType,
    ) -> RosterRecord {
        RosterRecord {
            name: name.to_string(),
            date_of_birth: days_ago(age_days),
            schedule,
            program_type,
            start_date: days_ago(120),
        }
    }

    pub(super) fn applicant(name: &str, age_days: i64, schedule: WeeklySchedule) -> ApplicantRequest {
        ApplicantRequest {
            name: name.to_string(),
            date_of_birth: days_ago(age_days),
            schedule,
            program_type: ProgramType::Fixed,
            preferred_joining_date: None,
        }
    }

    /// One seat per classroom keeps every scenario small.
    pub(super) fn single_seat_planner() -> EnrollmentPlanner {
        EnrollmentPlanner::new(PlannerConfig {
            capacity: ClassCapacity::new(&[1, 1, 1, 1]).expect("four capacities"),
            horizon_months: 3,
        })
    }
}

mod search {
    use super::common::*;
    use chrono::{Duration, Months};
    use classroom_planner::workflows::enrollment::{
        Applicant, AdmissionOutcome, AdmissionSearch, Availability, ClassCapacity, HoldRecord,
        Level, ProgramType, Roster, RosterInput, Weekday, WeeklySchedule,
    };

    #[test]
    fn open_seat_is_offered_on_preferred_date() {
        let input = RosterInput {
            active: vec![student("Ari", 1200, mon_wed(), ProgramType::Fixed)],
            hold: Vec::new(),
        };

        let report = single_seat_planner()
            .evaluate(&input, &applicant("Oli", 1300, friday()), today(), None)
            .expect("evaluation succeeds");

        assert_eq!(report.resolved_class, Level::Preschool);
        assert_eq!(report.active_count, 1);
        assert_eq!(report.resolved_date, Some(today()));
        assert_eq!(report.availability, Availability::Yes);
        assert_eq!(report.wait_days, 0);
    }

    #[test]
    fn full_fixed_classroom_leaves_older_applicant_without_a_date() {
        // Existing child is about 3.1 years old, the applicant about 4.9 and
        // ages out long before the existing child moves on.
        let input = RosterInput {
            active: vec![student("Ari", 1133, mon_wed(), ProgramType::Fixed)],
            hold: Vec::new(),
        };

        let report = single_seat_planner()
            .evaluate(&input, &applicant("Nia", 1790, monday()), today(), None)
            .expect("evaluation succeeds");

        assert_eq!(report.resolved_class, Level::Preschool);
        assert_eq!(report.resolved_date, None);
        assert_eq!(report.availability, Availability::No);
        assert_eq!(report.wait_days, 365);
        assert_eq!(report.resolved_schedule, monday());
        assert!(!report.flexible_placement);
    }

    #[test]
    fn flexible_student_in_full_classroom_yields_deferred_placement() {
        let input = RosterInput {
            active: vec![student("Ari", 1133, mon_wed(), ProgramType::Flexible)],
            hold: Vec::new(),
        };

        let report = single_seat_planner()
            .evaluate(&input, &applicant("Nia", 1790, monday()), today(), None)
            .expect("evaluation succeeds");

        assert_eq!(report.resolved_date, Some(today() + Duration::days(32)));
        assert_eq!(report.wait_days, 32);
        assert_eq!(report.availability, Availability::No);
        assert!(report.flexible_placement);
    }

    #[test]
    fn seat_opens_when_existing_student_is_promoted() {
        // About three weeks short of two years old.
        let ari = student("Ari", 710, monday(), ProgramType::Fixed);
        let promotion = ari
            .date_of_birth
            .checked_add_months(Months::new(24))
            .expect("in range");
        let input = RosterInput {
            active: vec![ari],
            hold: Vec::new(),
        };

        let capacity = ClassCapacity::new(&[1, 1, 1, 1]).expect("four capacities");
        let (roster, _) = Roster::from_records(capacity, &input, today());
        let applicant =
            Applicant::new(&applicant("Nia", 400, monday()), today()).expect("classifiable");
        assert_eq!(applicant.level, Level::Wobblers);

        let mut search = AdmissionSearch::new(&roster);
        match search.find_admission_date(&applicant, today()) {
            AdmissionOutcome::Found(slot) => {
                assert_eq!(slot.date, promotion);
                assert!(!slot.flexible_placement);
            }
            other => panic!("expected a slot, got {other:?}"),
        }

        // The search works on its own copy.
        assert_eq!(roster.active_at(Level::Wobblers).count(), 1);
        assert_eq!(search.roster().active_at(Level::OlderToddlers).count(), 1);
    }

    #[test]
    fn cascade_of_promotions_yields_a_date_the_roster_can_honour() {
        // Wobblers has two Monday seats, both taken. Mo leaves in about three
        // weeks, but Ivo (turning one sooner) is already queued for that seat.
        // Lea leaves next June into a full Older Toddlers room.
        let mo = student("Mo", 710, monday(), ProgramType::Fixed);
        let lea = student("Lea", 500, monday(), ProgramType::Fixed);
        let ivo = student("Ivo", 355, monday(), ProgramType::Fixed);
        let mo_leaves = mo.date_of_birth + Months::new(24);
        let lea_leaves = lea.date_of_birth + Months::new(24);
        let input = RosterInput {
            active: vec![mo, lea, ivo],
            hold: vec![HoldRecord {
                name: "Tam".to_string(),
                date_of_birth: days_ago(300),
                schedule: WeeklySchedule::new([Weekday::Tuesday]),
                program_type: ProgramType::Fixed,
                admission_date: today(),
            }],
        };

        let capacity = ClassCapacity::new(&[1, 2, 1, 1]).expect("four capacities");
        let (baseline, _) = Roster::from_records(capacity, &input, today());
        let applicant =
            Applicant::new(&applicant("Nia", 400, monday()), today()).expect("classifiable");
        assert_eq!(applicant.level, Level::Wobblers);

        let mut search = AdmissionSearch::new(&baseline);
        let slot = match search.find_admission_date(&applicant, today()) {
            AdmissionOutcome::Found(slot) => slot,
            other => panic!("expected a slot, got {other:?}"),
        };
        assert!(!slot.flexible_placement);
        assert!(slot.date > mo_leaves);
        assert_eq!(slot.date, lea_leaves);

        let mut replay = baseline.snapshot();
        replay.advance(slot.date);
        assert!(replay.can_place(&slot.schedule, applicant.level));

        let mut replayed: Vec<String> = replay
            .active_at(Level::Wobblers)
            .map(|student| student.name.clone())
            .collect();
        let searched = search.into_roster();
        let mut stepped: Vec<String> = searched
            .active_at(Level::Wobblers)
            .map(|student| student.name.clone())
            .collect();
        replayed.sort();
        stepped.sort();
        assert_eq!(replayed, ["Ivo", "Tam"]);
        assert_eq!(stepped, replayed);
        assert_eq!(searched.promoted_queue(Level::OlderToddlers)[0].name, "Lea");
    }

    #[test]
    fn preferred_date_in_the_future_is_respected() {
        let input = RosterInput::default();
        let mut request = applicant("Nia", 400, monday());
        request.preferred_joining_date = Some(today() + Duration::days(14));

        let report = single_seat_planner()
            .evaluate(&input, &request, today(), Some(2.5))
            .expect("evaluation succeeds");

        assert_eq!(report.requested_date, today() + Duration::days(14));
        assert_eq!(report.resolved_date, Some(today() + Duration::days(14)));
        assert_eq!(report.wait_days, 0);
        assert_eq!(report.fte, Some(2.5));
    }

    #[test]
    fn applicant_too_old_for_any_classroom_is_rejected() {
        let error = single_seat_planner()
            .evaluate(
                &RosterInput::default(),
                &applicant("Max", 2000, monday()),
                today(),
                None,
            )
            .expect_err("graduated applicant");

        assert!(error.to_string().contains("Max"));
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use classroom_planner::workflows::enrollment::enrollment_router;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn build_router() -> axum::Router {
        enrollment_router(Arc::new(single_seat_planner()))
    }

    async fn post(router: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        (status, serde_json::from_slice(&body).expect("json"))
    }

    const ACTIVE_CSV: &str = "First Name,Last Name,Dob,Time Schedule,Tags,Admission Date\n\
Ari,Stone,2023-09-10,\"Mon, Wed\",,2026-06-01\n";

    #[tokio::test]
    async fn admission_check_returns_report() {
        let (status, payload) = post(
            build_router(),
            "/api/v1/admission/check",
            json!({
                "applicant": {
                    "name": "Nia",
                    "date_of_birth": "2022-11-20",
                    "schedule": ["monday"],
                },
                "active_csv": ACTIVE_CSV,
                "hold_csv": "",
                "fte_csv": "Room,Total\nPreschool,0.75\n",
                "today": today(),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.get("resolved_class"), Some(&json!("preschool")));
        assert_eq!(payload.get("active_count"), Some(&json!(1)));
        assert_eq!(payload.get("availability"), Some(&json!("no")));
        assert_eq!(payload.get("fte"), Some(&json!(0.75)));
    }

    #[tokio::test]
    async fn malformed_roster_is_a_bad_request() {
        let (status, payload) = post(
            build_router(),
            "/api/v1/admission/check",
            json!({
                "applicant": {
                    "name": "Nia",
                    "date_of_birth": "2025-11-20",
                },
                "active_csv": "Name,Birthday\nAri,2024-01-01\n",
                "today": today(),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload
            .get("error")
            .and_then(Value::as_str)
            .is_some_and(|message| message.contains("Dob")));
    }

    #[tokio::test]
    async fn unclassifiable_applicant_is_unprocessable() {
        let (status, _) = post(
            build_router(),
            "/api/v1/admission/check",
            json!({
                "applicant": {
                    "name": "Max",
                    "date_of_birth": "2020-01-01",
                },
                "today": today(),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn forecast_past_the_calendar_is_unprocessable() {
        let planner = classroom_planner::workflows::enrollment::EnrollmentPlanner::new(
            classroom_planner::config::PlannerConfig {
                horizon_months: u32::MAX,
                ..classroom_planner::config::PlannerConfig::default()
            },
        );
        let (status, payload) = post(
            enrollment_router(Arc::new(planner)),
            "/api/v1/admission/forecast",
            json!({
                "class": "infants",
                "start": today(),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(payload.get("error").and_then(Value::as_str).is_some());
    }

    #[tokio::test]
    async fn forecast_returns_one_entry_per_day() {
        let (status, payload) = post(
            build_router(),
            "/api/v1/admission/forecast",
            json!({
                "active_csv": ACTIVE_CSV,
                "class": "preschool",
                "start": today(),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let days = payload
            .get("days")
            .and_then(Value::as_array)
            .expect("days array");
        assert_eq!(days.len(), 93);
        assert_eq!(days[0].get("day_of_week"), Some(&json!("Friday")));
        assert_eq!(days[3].get("occupancy"), Some(&json!(1)));
    }
}

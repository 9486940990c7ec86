use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::classifier::classify;
use super::domain::{ClassPlacement, Level, RosterInput};
use super::planner::EnrollmentPlanner;
use super::report::{AdmissionReport, DailyFeedEntry};
use super::student::ApplicantRequest;
use crate::workflows::roster_import::{FteImporter, RosterImportError, RosterImporter};

/// Roster exports as submitted by the front office, in CSV form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterUpload {
    #[serde(default)]
    pub active_csv: String,
    #[serde(default)]
    pub hold_csv: String,
}

impl RosterUpload {
    pub fn load(&self) -> Result<RosterInput, RosterImportError> {
        RosterImporter::from_reader(
            Cursor::new(self.active_csv.as_bytes()),
            Cursor::new(self.hold_csv.as_bytes()),
        )
        .map(|import| import.input)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdmissionCheckRequest {
    pub applicant: ApplicantRequest,
    #[serde(flatten)]
    pub roster: RosterUpload,
    #[serde(default)]
    pub fte_csv: Option<String>,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastRequest {
    #[serde(flatten)]
    pub roster: RosterUpload,
    pub class: Level,
    #[serde(default)]
    pub start: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastResponse {
    pub class: Level,
    pub start: NaiveDate,
    pub days: Vec<DailyFeedEntry>,
}

/// Router builder exposing the admission check and forecast endpoints.
pub fn enrollment_router(planner: Arc<EnrollmentPlanner>) -> Router {
    Router::new()
        .route("/api/v1/admission/check", post(check_handler))
        .route("/api/v1/admission/forecast", post(forecast_handler))
        .with_state(planner)
}

pub(crate) async fn check_handler(
    State(planner): State<Arc<EnrollmentPlanner>>,
    axum::Json(request): axum::Json<AdmissionCheckRequest>,
) -> Response {
    let today = request.today.unwrap_or_else(|| Local::now().date_naive());

    let input = match request.roster.load() {
        Ok(input) => input,
        Err(error) => return import_failure(error),
    };

    let fte = match request.fte_csv.as_deref() {
        Some(csv) => match classify(request.applicant.date_of_birth, today) {
            ClassPlacement::Class(level) => {
                match FteImporter::total_for(Cursor::new(csv.as_bytes()), level) {
                    Ok(total) => Some(total),
                    Err(error) => return import_failure(error),
                }
            }
            ClassPlacement::Graduated | ClassPlacement::NotYetBorn => None,
        },
        None => None,
    };

    match planner.evaluate(&input, &request.applicant, today, fte) {
        Ok(report) => (StatusCode::OK, axum::Json::<AdmissionReport>(report)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn forecast_handler(
    State(planner): State<Arc<EnrollmentPlanner>>,
    axum::Json(request): axum::Json<ForecastRequest>,
) -> Response {
    let start = request.start.unwrap_or_else(|| Local::now().date_naive());

    let input = match request.roster.load() {
        Ok(input) => input,
        Err(error) => return import_failure(error),
    };

    match planner.forecast(&input, request.class, start) {
        Ok(days) => {
            let body = ForecastResponse {
                class: request.class,
                start,
                days,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

fn import_failure(error: RosterImportError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

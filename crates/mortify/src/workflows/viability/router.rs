use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Datelike, Local};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplianceId, BrandSelection, ExpertOverride, ReviewStatus, SaveOutcome};
use super::numeric::{lenient_opt_f64, lenient_opt_i32, lenient_opt_u32, lenient_opt_u8};
use super::repository::{
    ApplianceRepository, AssessmentId, AssessmentRepository, CategoryCatalog, ExpertReview,
    RepairLedger, RepositoryError, ReviewQueue,
};
use super::service::{AssessmentInputs, ViabilityService, ViabilityServiceError};

/// Router builder exposing the scoring, verdict, and review endpoints.
pub fn viability_router<P, C, L, A, Q>(service: Arc<ViabilityService<P, C, L, A, Q>>) -> Router
where
    P: ApplianceRepository + 'static,
    C: CategoryCatalog + 'static,
    L: RepairLedger + 'static,
    A: AssessmentRepository + 'static,
    Q: ReviewQueue + 'static,
{
    Router::new()
        .route(
            "/api/v1/appliances/:appliance_id/assessments",
            post(run_assessment_handler::<P, C, L, A, Q>)
                .get(list_assessments_handler::<P, C, L, A, Q>),
        )
        .route(
            "/api/v1/appliances/:appliance_id/viability",
            get(viability_handler::<P, C, L, A, Q>),
        )
        .route(
            "/api/v1/appliances/:appliance_id/verdict",
            get(quick_verdict_handler::<P, C, L, A, Q>),
        )
        .route(
            "/api/v1/appliances/:appliance_id/expert-override",
            post(expert_override_handler::<P, C, L, A, Q>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/review",
            post(review_handler::<P, C, L, A, Q>),
        )
        .with_state(service)
}

/// Scoring request body. Numeric fields tolerate string and number forms
/// interchangeably; anything unparseable is treated as absent.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RunAssessmentRequest {
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub(crate) input_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub(crate) input_floor_level: Option<i32>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub(crate) total_spent_override: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub(crate) repair_count: Option<u32>,
    #[serde(default)]
    pub(crate) brand: Option<BrandSelection>,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub(crate) current_year: Option<i32>,
}

impl RunAssessmentRequest {
    fn into_inputs(self) -> (AssessmentInputs, Option<i32>) {
        let current_year = self.current_year;
        let inputs = AssessmentInputs {
            input_year: self.input_year,
            input_floor_level: self.input_floor_level,
            total_spent_override: self.total_spent_override,
            repair_count: self.repair_count,
            brand: self.brand,
        };
        (inputs, current_year)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExpertOverrideRequest {
    #[serde(default)]
    pub(crate) endorsed: bool,
    #[serde(default)]
    pub(crate) note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReviewRequest {
    #[serde(default)]
    pub(crate) status: Option<ReviewStatus>,
    #[serde(default)]
    pub(crate) note: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_u8")]
    pub(crate) bonus_points: Option<u8>,
}

fn this_year() -> i32 {
    Local::now().year()
}

pub(crate) async fn run_assessment_handler<P, C, L, A, Q>(
    State(service): State<Arc<ViabilityService<P, C, L, A, Q>>>,
    Path(appliance_id): Path<String>,
    axum::Json(request): axum::Json<RunAssessmentRequest>,
) -> Response
where
    P: ApplianceRepository + 'static,
    C: CategoryCatalog + 'static,
    L: RepairLedger + 'static,
    A: AssessmentRepository + 'static,
    Q: ReviewQueue + 'static,
{
    let id = ApplianceId(appliance_id);
    let (inputs, current_year) = request.into_inputs();
    let current_year = current_year.unwrap_or_else(this_year);

    match service.run_assessment(&id, inputs, current_year) {
        Ok(assessment) => {
            let view = assessment.view();
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(ViabilityServiceError::ApplianceNotFound(id)) => {
            let payload = json!({
                "error": "appliance not found",
                "appliance_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(ViabilityServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "assessment already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn list_assessments_handler<P, C, L, A, Q>(
    State(service): State<Arc<ViabilityService<P, C, L, A, Q>>>,
    Path(appliance_id): Path<String>,
) -> Response
where
    P: ApplianceRepository + 'static,
    C: CategoryCatalog + 'static,
    L: RepairLedger + 'static,
    A: AssessmentRepository + 'static,
    Q: ReviewQueue + 'static,
{
    let id = ApplianceId(appliance_id);
    match service.assessments(&id) {
        Ok(assessments) => {
            let views: Vec<_> = assessments
                .iter()
                .map(|assessment| assessment.view())
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn viability_handler<P, C, L, A, Q>(
    State(service): State<Arc<ViabilityService<P, C, L, A, Q>>>,
    Path(appliance_id): Path<String>,
) -> Response
where
    P: ApplianceRepository + 'static,
    C: CategoryCatalog + 'static,
    L: RepairLedger + 'static,
    A: AssessmentRepository + 'static,
    Q: ReviewQueue + 'static,
{
    let id = ApplianceId(appliance_id);
    match service.viability(&id, this_year()) {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

/// A missing appliance is a valid UNKNOWN verdict, so this handler answers
/// 200 for ids the store has never seen.
pub(crate) async fn quick_verdict_handler<P, C, L, A, Q>(
    State(service): State<Arc<ViabilityService<P, C, L, A, Q>>>,
    Path(appliance_id): Path<String>,
) -> Response
where
    P: ApplianceRepository + 'static,
    C: CategoryCatalog + 'static,
    L: RepairLedger + 'static,
    A: AssessmentRepository + 'static,
    Q: ReviewQueue + 'static,
{
    let id = ApplianceId(appliance_id);
    match service.quick_verdict(&id, this_year()) {
        Ok(verdict) => (StatusCode::OK, axum::Json(verdict)).into_response(),
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn expert_override_handler<P, C, L, A, Q>(
    State(service): State<Arc<ViabilityService<P, C, L, A, Q>>>,
    Path(appliance_id): Path<String>,
    axum::Json(request): axum::Json<ExpertOverrideRequest>,
) -> Response
where
    P: ApplianceRepository + 'static,
    C: CategoryCatalog + 'static,
    L: RepairLedger + 'static,
    A: AssessmentRepository + 'static,
    Q: ReviewQueue + 'static,
{
    let id = ApplianceId(appliance_id);
    let endorsement = ExpertOverride {
        endorsed: request.endorsed,
        note: request.note,
    };

    match service.set_expert_override(&id, endorsement) {
        Ok(outcome @ SaveOutcome::Saved { .. }) => {
            (StatusCode::OK, axum::Json(outcome)).into_response()
        }
        Ok(outcome @ SaveOutcome::Reverted { .. }) => {
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(outcome)).into_response()
        }
        Err(ViabilityServiceError::ApplianceNotFound(id)) => {
            let payload = json!({
                "error": "appliance not found",
                "appliance_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn review_handler<P, C, L, A, Q>(
    State(service): State<Arc<ViabilityService<P, C, L, A, Q>>>,
    Path(assessment_id): Path<String>,
    axum::Json(request): axum::Json<ReviewRequest>,
) -> Response
where
    P: ApplianceRepository + 'static,
    C: CategoryCatalog + 'static,
    L: RepairLedger + 'static,
    A: AssessmentRepository + 'static,
    Q: ReviewQueue + 'static,
{
    let id = AssessmentId(assessment_id);
    let review = ExpertReview {
        status: request.status,
        note: request.note,
        bonus_points: request.bonus_points,
    };

    match service.review(&id, review) {
        Ok(assessment) => {
            let view = assessment.view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(ViabilityServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "assessment not found",
                "assessment_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Datelike, Local};
use mortify::workflows::viability::{
    numeric, viability_router, AmortizationEngine, ApplianceRepository, AssessmentRepository,
    BandView, BrandTierTable, CategoryCatalog, CategoryDefaults, RepairLedger, ReviewQueue,
    ScoreBand, ScoreComponent, ScoringConfig, ScoringSnapshot, ViabilityService,
    ViabilitySuggestion, FALLBACK_LIFESPAN_YEARS, FALLBACK_MARKET_PRICE,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// One-off scoring request. Nothing is stored; the caller supplies whatever
/// context it has and the rubric fills the gaps with service fallbacks.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ViabilityPreviewRequest {
    pub(crate) brand: String,
    #[serde(default)]
    pub(crate) category: Option<String>,
    #[serde(default, deserialize_with = "numeric::lenient_opt_i32")]
    pub(crate) current_year: Option<i32>,
    #[serde(default, deserialize_with = "numeric::lenient_opt_i32")]
    pub(crate) purchase_year: Option<i32>,
    #[serde(default, deserialize_with = "numeric::lenient_opt_i32")]
    pub(crate) floor_level: Option<i32>,
    #[serde(default, deserialize_with = "numeric::lenient_opt_f64")]
    pub(crate) total_spent: Option<f64>,
    #[serde(default, deserialize_with = "numeric::lenient_opt_f64")]
    pub(crate) avg_market_price: Option<f64>,
    #[serde(default, deserialize_with = "numeric::lenient_opt_u8")]
    pub(crate) avg_lifespan_years: Option<u8>,
    #[serde(default)]
    pub(crate) trivial_install: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ViabilityPreviewResponse {
    pub(crate) total_score: u8,
    pub(crate) suggestion: ViabilitySuggestion,
    pub(crate) display_level: u8,
    pub(crate) band: BandView,
    pub(crate) components: Vec<ScoreComponent>,
}

pub(crate) fn with_viability_routes<P, C, L, A, Q>(
    service: Arc<ViabilityService<P, C, L, A, Q>>,
) -> axum::Router
where
    P: ApplianceRepository + 'static,
    C: CategoryCatalog + 'static,
    L: RepairLedger + 'static,
    A: AssessmentRepository + 'static,
    Q: ReviewQueue + 'static,
{
    viability_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/viability/preview",
            axum::routing::post(viability_preview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn viability_preview_endpoint(
    Json(payload): Json<ViabilityPreviewRequest>,
) -> Json<ViabilityPreviewResponse> {
    let ViabilityPreviewRequest {
        brand,
        category,
        current_year,
        purchase_year,
        floor_level,
        total_spent,
        avg_market_price,
        avg_lifespan_years,
        trivial_install,
    } = payload;

    let defaults = CategoryDefaults {
        category: category.unwrap_or_else(|| "unspecified".to_string()),
        avg_market_price: avg_market_price.unwrap_or(FALLBACK_MARKET_PRICE),
        avg_lifespan_years: avg_lifespan_years.unwrap_or(FALLBACK_LIFESPAN_YEARS),
        trivial_install,
    };
    let snapshot = ScoringSnapshot {
        brand,
        current_year: current_year.unwrap_or_else(|| Local::now().year()),
        purchase_year,
        floor_level: floor_level.unwrap_or(0),
        total_spent: total_spent.unwrap_or(0.0),
        defaults,
    };

    let engine = AmortizationEngine::new(ScoringConfig::default(), BrandTierTable::standard());
    let breakdown = engine.score(&snapshot);

    let display_level = mortify::workflows::viability::display_level(breakdown.total_score, 0);
    let band = ScoreBand::from_level(i32::from(display_level));

    Json(ViabilityPreviewResponse {
        total_score: breakdown.total_score,
        suggestion: breakdown.suggestion,
        display_level,
        band: band.view(),
        components: breakdown.components,
    })
}

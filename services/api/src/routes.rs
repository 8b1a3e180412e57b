use crate::infra::{deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use land_use::calculator::{
    aggregate, CalculationOptions, GreenAllocationMethod, GreenDeductionPolicy, LandUseResults,
    Plot, RoundingMode,
};
use land_use::config::CalculatorDefaults;
use land_use::error::AppError;
use land_use::report::{price_per_buildable_area, PortfolioSummary};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

/// Plot list plus option overrides; unset options fall back to the configured defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CalculationRequest {
    pub(crate) plots: Vec<Plot>,
    #[serde(default)]
    pub(crate) project_name: Option<String>,
    #[serde(default)]
    pub(crate) total_price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) prepared_on: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) apply_efficiency_incentive: Option<bool>,
    #[serde(default)]
    pub(crate) green_policy: Option<GreenDeductionPolicy>,
    #[serde(default)]
    pub(crate) green_allocation_method: Option<GreenAllocationMethod>,
    #[serde(default)]
    pub(crate) custom_green_allocations: Option<Vec<f64>>,
    #[serde(default)]
    pub(crate) rounding: Option<RoundingMode>,
}

impl CalculationRequest {
    pub(crate) fn options(&self, defaults: &CalculatorDefaults) -> CalculationOptions {
        let base = defaults.options();
        CalculationOptions {
            apply_efficiency_incentive: self
                .apply_efficiency_incentive
                .unwrap_or(base.apply_efficiency_incentive),
            green_policy: self.green_policy.unwrap_or(base.green_policy),
            green_allocation_method: self
                .green_allocation_method
                .unwrap_or(base.green_allocation_method),
            custom_green_allocations: self
                .custom_green_allocations
                .clone()
                .unwrap_or(base.custom_green_allocations),
            rounding: self.rounding.unwrap_or(base.rounding),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CalculationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) project_name: Option<String>,
    pub(crate) prepared_on: NaiveDate,
    pub(crate) summary: PortfolioSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) price_per_buildable_area: Option<f64>,
    pub(crate) results: LandUseResults,
}

pub(crate) fn build_response(
    request: CalculationRequest,
    defaults: &CalculatorDefaults,
) -> Result<CalculationResponse, AppError> {
    let options = request.options(defaults);
    let results = aggregate(&request.plots, &options)?;
    let summary = results.summary();
    let price_per_buildable_area = request
        .total_price
        .map(|price| price_per_buildable_area(price, results.totals.total_buildable_area));

    info!(
        plots = request.plots.len(),
        total_buildable_area = summary.total_buildable_area,
        "portfolio calculated"
    );

    Ok(CalculationResponse {
        project_name: request.project_name,
        prepared_on: request
            .prepared_on
            .unwrap_or_else(|| Local::now().date_naive()),
        summary,
        price_per_buildable_area,
        results,
    })
}

pub(crate) fn calculation_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/land-use/calculate", post(calculate_endpoint))
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

pub(crate) async fn calculate_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<CalculationRequest>,
) -> Result<Json<CalculationResponse>, AppError> {
    build_response(payload, &state.defaults).map(Json)
}

//! JSON API handlers
//!
//! Each endpoint returns the same view struct the HTML page renders.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::service::DashboardService;
use crate::trainer::FeatureInput;
use crate::views::{
    self, CostView, CustomerView, FleetView, OverviewView, PerformanceView, RiskView,
    SustainabilityView,
};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Deserialize)]
pub struct RiskQuery {
    pub order_id: Option<String>,
}

pub type AppState = Arc<DashboardService>;
pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: message.into() }))
}

fn internal(e: anyhow::Error) -> ApiError {
    tracing::error!("request failed: {:#}", e);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e))
}

/// GET /api/v1/health
pub async fn health(State(service): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "orders": service.data().orders.len(),
    }))
}

/// GET /api/v1/overview
pub async fn get_overview(State(service): State<AppState>) -> Json<OverviewView> {
    Json(views::executive_overview(service.data()))
}

/// GET /api/v1/risk?order_id=X
pub async fn get_risk(
    State(service): State<AppState>,
    Query(params): Query<RiskQuery>,
) -> Result<Json<RiskView>, ApiError> {
    let model = service.model().await.map_err(internal)?;
    let requested = params.order_id.as_deref().filter(|s| !s.is_empty());
    match views::delivery_risk(service.data(), &model, requested) {
        Ok(Some(view)) => Ok(Json(view)),
        Ok(None) => Err(api_error(
            StatusCode::NOT_FOUND,
            match requested {
                Some(id) => format!("Order not found: {}", id),
                None => "No orders loaded".to_string(),
            },
        )),
        Err(e) => Err(internal(e)),
    }
}

/// GET /api/v1/performance
pub async fn get_performance(
    State(service): State<AppState>,
) -> Result<Json<PerformanceView>, ApiError> {
    let model = service.model().await.map_err(internal)?;
    Ok(Json(views::model_performance(&model)))
}

/// GET /api/v1/fleet
pub async fn get_fleet(State(service): State<AppState>) -> Json<FleetView> {
    Json(views::fleet_optimization(service.data()))
}

/// GET /api/v1/cost
pub async fn get_cost(State(service): State<AppState>) -> Json<CostView> {
    Json(views::cost_intelligence(service.data()))
}

/// GET /api/v1/customer
pub async fn get_customer(State(service): State<AppState>) -> Json<CustomerView> {
    Json(views::customer_experience(service.data()))
}

/// GET /api/v1/sustainability
pub async fn get_sustainability(State(service): State<AppState>) -> Json<SustainabilityView> {
    Json(views::sustainability(service.data()))
}

/// POST /api/v1/predict - risk for caller-supplied feature values
pub async fn predict(
    State(service): State<AppState>,
    Json(input): Json<FeatureInput>,
) -> Result<Json<RiskView>, ApiError> {
    let model = service.model().await.map_err(internal)?;
    let risk = model
        .predict_risk(&input)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    Ok(Json(RiskView::new(None, risk, input)))
}

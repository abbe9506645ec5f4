//! HTTP surface of the dashboard
//!
//! HTML pages live under `/views/*`, the same view data as JSON under `/api/v1/*`.

pub mod handlers;
pub mod pages;
pub mod service;

pub use service::DashboardService;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn router(service: Arc<DashboardService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Pages
        .route("/", get(pages::index))
        .route("/views/:name", get(pages::view))
        // JSON
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/overview", get(handlers::get_overview))
        .route("/api/v1/risk", get(handlers::get_risk))
        .route("/api/v1/performance", get(handlers::get_performance))
        .route("/api/v1/fleet", get(handlers::get_fleet))
        .route("/api/v1/cost", get(handlers::get_cost))
        .route("/api/v1/customer", get(handlers::get_customer))
        .route("/api/v1/sustainability", get(handlers::get_sustainability))
        .route("/api/v1/predict", post(handlers::predict))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::ForestConfig;
    use crate::models::Dataset;
    use crate::trainer::fixtures::synthetic_orders;
    use crate::trainer::ModelConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        let data = Dataset {
            orders: synthetic_orders(80),
            vehicles: Vec::new(),
        };
        let config = ModelConfig {
            forest: ForestConfig {
                n_trees: 15,
                ..ForestConfig::default()
            },
            ..ModelConfig::default()
        };
        router(Arc::new(DashboardService::new(data, config)))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index_redirects() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/views/overview");
    }

    #[tokio::test]
    async fn test_every_view_renders() {
        for (slug, _) in crate::views::VIEWS {
            let (status, body) = get(app(), &format!("/views/{}", slug)).await;
            assert_eq!(status, StatusCode::OK, "view {}", slug);
            assert!(body.starts_with("<!DOCTYPE html>"));
        }
    }

    #[tokio::test]
    async fn test_unknown_view_and_order() {
        let (status, _) = get(app(), "/views/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = get(app(), "/views/risk?order_id=MISSING").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, body) = get(app(), "/api/v1/risk?order_id=MISSING").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Order not found: MISSING"));
    }

    #[tokio::test]
    async fn test_json_endpoints() {
        let (status, body) = get(app(), "/api/v1/overview").await;
        assert_eq!(status, StatusCode::OK);
        let overview: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(overview["total_orders"], 80);

        let (status, body) = get(app(), "/api/v1/performance").await;
        assert_eq!(status, StatusCode::OK);
        let perf: serde_json::Value = serde_json::from_str(&body).unwrap();
        let total: f64 = perf["feature_importance"]
            .as_array()
            .unwrap()
            .iter()
            .map(|pair| pair[1].as_f64().unwrap())
            .sum();
        assert!((total - 1.0).abs() < 1e-9);

        let (status, body) = get(app(), "/api/v1/risk?order_id=ORD000002").await;
        assert_eq!(status, StatusCode::OK);
        let risk: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(risk["order_id"], "ORD000002");
    }

    #[tokio::test]
    async fn test_empty_order_id_falls_back_to_first_order() {
        let (status, body) = get(app(), "/api/v1/risk?order_id=").await;
        assert_eq!(status, StatusCode::OK);
        let risk: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(risk["order_id"], "ORD000001");

        let (status, _) = get(app(), "/views/risk?order_id=").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_predict_endpoint() {
        let payload = serde_json::json!({
            "route_distance_km": 1800.0,
            "vehicle_capacity": 2500.0,
            "warehouse_load": 40.0,
            "delivery_priority": "Economy",
            "fuel_cost": 720.0,
            "maintenance_cost": 160.0
        });
        let request = |body: serde_json::Value| {
            Request::builder()
                .method("POST")
                .uri("/api/v1/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        };

        let response = app().oneshot(request(payload.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let risk: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let pct = risk["risk_pct"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&pct));
        assert!(risk["order_id"].is_null());

        let mut unknown = payload;
        unknown["delivery_priority"] = "Overnight".into();
        let response = app().oneshot(request(unknown)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

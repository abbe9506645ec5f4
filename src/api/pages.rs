//! HTML page handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use super::handlers::{AppState, RiskQuery};
use crate::render;
use crate::views;

/// GET /
pub async fn index() -> Redirect {
    Redirect::to("/views/overview")
}

/// GET /views/:name
pub async fn view(
    State(service): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<RiskQuery>,
) -> Response {
    let data = service.data();
    let html = match name.as_str() {
        "overview" => render::overview_page(&views::executive_overview(data)),
        "fleet" => render::fleet_page(&views::fleet_optimization(data)),
        "cost" => render::cost_page(&views::cost_intelligence(data)),
        "customer" => render::customer_page(&views::customer_experience(data)),
        "sustainability" => render::sustainability_page(&views::sustainability(data)),
        "risk" | "performance" => match service.model().await {
            Ok(model) if name == "risk" => {
                let requested = params.order_id.as_deref().filter(|s| !s.is_empty());
                match views::delivery_risk(data, &model, requested) {
                    Ok(Some(view)) => render::risk_page(Some(&view), requested),
                    Ok(None) => {
                        let page = render::risk_page(None, requested);
                        let status = if requested.is_some() {
                            StatusCode::NOT_FOUND
                        } else {
                            StatusCode::OK
                        };
                        return (status, Html(page)).into_response();
                    }
                    Err(e) => return model_error(&name, e),
                }
            }
            Ok(model) => render::performance_page(&views::model_performance(&model)),
            Err(e) => return model_error(&name, e),
        },
        _ => {
            let page = render::error_page(
                "",
                "Not Found",
                &format!("Unknown view '{}'", name),
            );
            return (StatusCode::NOT_FOUND, Html(page)).into_response();
        }
    };
    Html(html).into_response()
}

fn model_error(name: &str, e: anyhow::Error) -> Response {
    tracing::error!("model unavailable for {} view: {:#}", name, e);
    let page = render::error_page(
        name,
        "Model unavailable",
        &format!("The delay model could not be trained: {:#}", e),
    );
    (StatusCode::SERVICE_UNAVAILABLE, Html(page)).into_response()
}

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - Service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "KyndKart API",
        "version": version,
        "endpoints": {
            "auth": "/register/, /login/ (public)",
            "tasks": "/task/, /tasks/ (protected)",
            "donations": "/donate/, /donations/ (protected)",
            "shop": "/shop/donate/, /shop/donations/ (protected)",
            "admin": "/admin/receiver/, /admin/receivers/ (protected)",
            "orders": "/orders/, /orders/:id/ (protected)",
        }
    }))
}

/// GET /health - Store connectivity check
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

//! Health-check endpoint.

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

/// Router exposing `GET /health` reporting the service as up.
pub fn health_router(service: &'static str) -> Router {
    Router::new().route(
        "/health",
        get(move || async move {
            tracing::debug!("health check requested");
            Json(json!({
                "status": "ok",
                "service": service,
            }))
        }),
    )
}

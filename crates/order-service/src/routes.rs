//! Order routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::json;

use storefront_core::{OrderId, UserId};
use storefront_http::json_error;
use storefront_orders::{OrderDraft, OrderStatus};

use crate::app::HttpWorkflow;
use crate::workflow::WorkflowError;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_order))
        .route("/:id", get(get_order))
        .route("/user/:user_id", get(get_user_orders))
        .route("/:id/status", patch(update_order_status))
        .route("/:id/cancel", post(cancel_order))
}

fn error_to_response(err: WorkflowError) -> axum::response::Response {
    match err {
        WorkflowError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, msg),
        WorkflowError::Validation(msg) | WorkflowError::IllegalTransition(msg) => {
            json_error(StatusCode::BAD_REQUEST, msg)
        }
        WorkflowError::Internal(_) => {
            tracing::error!("order operation failed: {err}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

fn parse_order_id(raw: &str) -> Result<OrderId, axum::response::Response> {
    raw.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "Invalid order id"))
}

async fn create_order(
    Extension(workflow): Extension<Arc<HttpWorkflow>>,
    Json(body): Json<OrderDraft>,
) -> axum::response::Response {
    let violations = body.violations();
    if !violations.is_empty() {
        tracing::warn!("order validation failed: {violations:?}");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Validation Error",
                "details": violations,
            })),
        )
            .into_response();
    }

    match workflow.create_order(body).await {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(err) => error_to_response(err),
    }
}

async fn get_order(
    Extension(workflow): Extension<Arc<HttpWorkflow>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_order_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match workflow.order(id).await {
        Ok(order) => Json(order).into_response(),
        Err(err) => error_to_response(err),
    }
}

async fn get_user_orders(
    Extension(workflow): Extension<Arc<HttpWorkflow>>,
    Path(user_id): Path<String>,
) -> axum::response::Response {
    let user_id: UserId = match user_id.parse() {
        Ok(id) => id,
        Err(_) => return json_error(StatusCode::BAD_REQUEST, "Invalid user id"),
    };

    match workflow.orders_for_user(user_id).await {
        Ok(orders) => Json(orders).into_response(),
        Err(err) => error_to_response(err),
    }
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status: String,
}

async fn update_order_status(
    Extension(workflow): Extension<Arc<HttpWorkflow>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> axum::response::Response {
    let id = match parse_order_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let status: OrderStatus = match body.status.parse() {
        Ok(status) => status,
        Err(e) => {
            tracing::warn!("status update rejected: {e}");
            return json_error(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match workflow.set_status(id, status).await {
        Ok(order) => Json(order).into_response(),
        Err(err) => error_to_response(err),
    }
}

async fn cancel_order(
    Extension(workflow): Extension<Arc<HttpWorkflow>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_order_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match workflow.cancel(id).await {
        Ok(order) => Json(order).into_response(),
        Err(err) => error_to_response(err),
    }
}

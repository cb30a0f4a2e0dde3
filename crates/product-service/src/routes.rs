//! Product CRUD and stock routes.
//!
//! Error bodies here use `{"message": ...}`; the order service's outbound
//! client extracts that key when classifying failures.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;

use storefront_core::{DomainError, ProductId};
use storefront_products::{NewProduct, Product, ProductStore, ProductUpdate};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/category/:category", get(list_by_category))
        .route("/:id/stock", post(adjust_stock))
}

fn message_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(json!({
            "message": message.into(),
        })),
    )
        .into_response()
}

fn parse_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    raw.parse()
        .map_err(|_| message_error(StatusCode::BAD_REQUEST, "Invalid product id"))
}

async fn create_product(
    Extension(store): Extension<Arc<dyn ProductStore>>,
    Json(body): Json<NewProduct>,
) -> axum::response::Response {
    let product = match Product::new(body) {
        Ok(product) => product,
        Err(e) => {
            tracing::warn!("product validation failed: {e}");
            return message_error(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match store.insert(product).await {
        Ok(product) => {
            tracing::info!("product created: {}", product.id);
            (StatusCode::CREATED, Json(product)).into_response()
        }
        Err(e) => {
            tracing::error!("error creating product: {e}");
            message_error(StatusCode::INTERNAL_SERVER_ERROR, "Error creating product")
        }
    }
}

async fn list_products(
    Extension(store): Extension<Arc<dyn ProductStore>>,
) -> axum::response::Response {
    match store.find_all().await {
        Ok(products) => Json(products).into_response(),
        Err(e) => {
            tracing::error!("error fetching products: {e}");
            message_error(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching products")
        }
    }
}

async fn get_product(
    Extension(store): Extension<Arc<dyn ProductStore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match store.find_by_id(id).await {
        Ok(Some(product)) => Json(product).into_response(),
        Ok(None) => message_error(StatusCode::NOT_FOUND, "Product not found"),
        Err(e) => {
            tracing::error!("error fetching product: {e}");
            message_error(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching product")
        }
    }
}

async fn update_product(
    Extension(store): Extension<Arc<dyn ProductStore>>,
    Path(id): Path<String>,
    Json(body): Json<ProductUpdate>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let mut product = match store.find_by_id(id).await {
        Ok(Some(product)) => product,
        Ok(None) => return message_error(StatusCode::NOT_FOUND, "Product not found"),
        Err(e) => {
            tracing::error!("error updating product: {e}");
            return message_error(StatusCode::INTERNAL_SERVER_ERROR, "Error updating product");
        }
    };

    product.apply_update(body);
    match store.save(product).await {
        Ok(product) => {
            tracing::info!("product updated: {}", product.id);
            Json(product).into_response()
        }
        Err(e) => {
            tracing::error!("error updating product: {e}");
            message_error(StatusCode::INTERNAL_SERVER_ERROR, "Error updating product")
        }
    }
}

async fn delete_product(
    Extension(store): Extension<Arc<dyn ProductStore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match store.delete(id).await {
        Ok(true) => {
            tracing::info!("product deleted: {id}");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => message_error(StatusCode::NOT_FOUND, "Product not found"),
        Err(e) => {
            tracing::error!("error deleting product: {e}");
            message_error(StatusCode::INTERNAL_SERVER_ERROR, "Error deleting product")
        }
    }
}

async fn list_by_category(
    Extension(store): Extension<Arc<dyn ProductStore>>,
    Path(category): Path<String>,
) -> axum::response::Response {
    match store.find_by_category(&category).await {
        Ok(products) => Json(products).into_response(),
        Err(e) => {
            tracing::error!("error fetching products by category: {e}");
            message_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error fetching products by category",
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct StockAdjustment {
    /// Signed delta applied to the current stock level.
    quantity: i64,
}

async fn adjust_stock(
    Extension(store): Extension<Arc<dyn ProductStore>>,
    Path(id): Path<String>,
    Json(body): Json<StockAdjustment>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let mut product = match store.find_by_id(id).await {
        Ok(Some(product)) => product,
        Ok(None) => return message_error(StatusCode::NOT_FOUND, "Product not found"),
        Err(e) => {
            tracing::error!("error updating stock: {e}");
            return message_error(StatusCode::INTERNAL_SERVER_ERROR, "Error updating stock");
        }
    };

    if let Err(e) = product.adjust_stock(body.quantity) {
        match e {
            DomainError::Validation(msg) => {
                tracing::warn!("stock adjustment rejected for {id}: {msg}");
                return message_error(StatusCode::BAD_REQUEST, msg);
            }
            other => {
                tracing::error!("error updating stock: {other}");
                return message_error(StatusCode::INTERNAL_SERVER_ERROR, "Error updating stock");
            }
        }
    }

    match store.save(product).await {
        Ok(product) => {
            tracing::info!("stock for {} now {}", product.id, product.stock);
            Json(product).into_response()
        }
        Err(e) => {
            tracing::error!("error updating stock: {e}");
            message_error(StatusCode::INTERNAL_SERVER_ERROR, "Error updating stock")
        }
    }
}

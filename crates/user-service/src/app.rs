//! Application wiring.

use std::sync::Arc;

use axum::{Extension, Router};

use storefront_users::{InMemoryUserStore, UserStore};

use crate::routes;

/// Build the service router over the given store.
pub fn build_app(store: Arc<dyn UserStore>) -> Router {
    Router::new()
        .merge(storefront_http::health_router("user-service"))
        .nest("/api/users", routes::router())
        .layer(Extension(store))
}

/// Build the service router over a fresh in-memory store.
pub fn build_default_app() -> Router {
    build_app(Arc::new(InMemoryUserStore::new()))
}

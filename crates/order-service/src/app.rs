//! Application wiring.

use std::sync::Arc;

use axum::{Extension, Router};

use storefront_client::ServiceClient;
use storefront_orders::InMemoryOrderStore;

use crate::config::OrderServiceConfig;
use crate::gateways::{ProductGateway, UserGateway};
use crate::routes;
use crate::workflow::OrderWorkflow;

/// The workflow type the HTTP layer is wired against.
pub type HttpWorkflow = OrderWorkflow<ServiceClient, Arc<InMemoryOrderStore>>;

/// Build the service router with clients pointed at the configured
/// collaborators and a fresh in-memory store.
///
/// # Errors
///
/// Returns an error when an outbound client cannot be constructed.
pub fn build_app(config: &OrderServiceConfig) -> Result<Router, reqwest::Error> {
    let users = UserGateway::new(ServiceClient::new(&config.user_service_url)?);
    let products = ProductGateway::new(ServiceClient::new(&config.product_service_url)?);
    let workflow = OrderWorkflow::new(users, products, Arc::new(InMemoryOrderStore::new()));
    Ok(build_app_with(workflow))
}

/// Build the service router over an already-wired workflow (tests inject
/// clients with their own retry policies here).
pub fn build_app_with(workflow: HttpWorkflow) -> Router {
    Router::new()
        .merge(storefront_http::health_router("order-service"))
        .nest("/orders", routes::router())
        .layer(Extension(Arc::new(workflow)))
}

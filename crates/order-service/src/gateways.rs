//! Typed gateways over the user and product services.
//!
//! `fetch` surfaces classified errors; the boolean predicates (`is_valid`,
//! `is_available`) swallow every failure and answer `false`. The workflow
//! uses `fetch` so rejections can distinguish a missing record from short
//! stock.

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use storefront_client::{CallClient, RemoteCallError};
use storefront_core::{ProductId, UserId};

/// Read-only projection of a user owned by the user service. Fetched fresh
/// on every verification; never cached here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub is_active: bool,
}

/// Read-only projection of a product owned by the product service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub stock: i64,
    pub is_active: bool,
}

/// Lookup failure, classified for the workflow.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error("failed to fetch {entity}")]
    Upstream {
        entity: &'static str,
        source: RemoteCallError,
    },
}

fn classify_fetch(entity: &'static str, err: RemoteCallError) -> GatewayError {
    if err.is_not_found() {
        tracing::warn!("{entity} not found");
        GatewayError::NotFound { entity }
    } else {
        tracing::error!("error fetching {entity}: {err}");
        GatewayError::Upstream {
            entity,
            source: err,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    entity: &'static str,
    value: serde_json::Value,
) -> Result<T, GatewayError> {
    serde_json::from_value(value).map_err(|e| {
        tracing::error!("unexpected {entity} payload: {e}");
        GatewayError::Upstream {
            entity,
            source: RemoteCallError::new(500, e.to_string()),
        }
    })
}

/// Lookups against the user service.
pub struct UserGateway<C> {
    client: C,
}

impl<C: CallClient> UserGateway<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Fetch a user by id. A 404 maps to [`GatewayError::NotFound`]; any
    /// other failure to [`GatewayError::Upstream`].
    pub async fn fetch(&self, user_id: UserId) -> Result<RemoteUser, GatewayError> {
        match self.client.get(&format!("/users/{user_id}")).await {
            Ok(value) => decode("user", value),
            Err(err) => Err(classify_fetch("user", err)),
        }
    }

    /// Whether the user exists and is active. Never fails: any lookup
    /// problem, not-found included, degrades to `false`.
    pub async fn is_valid(&self, user_id: UserId) -> bool {
        match self.fetch(user_id).await {
            Ok(user) => user.is_active,
            Err(_) => false,
        }
    }
}

/// Lookups and stock adjustments against the product service.
pub struct ProductGateway<C> {
    client: C,
}

impl<C: CallClient> ProductGateway<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Fetch a product by id. A 404 maps to [`GatewayError::NotFound`]; any
    /// other failure to [`GatewayError::Upstream`].
    pub async fn fetch(&self, product_id: ProductId) -> Result<RemoteProduct, GatewayError> {
        match self.client.get(&format!("/products/{product_id}")).await {
            Ok(value) => decode("product", value),
            Err(err) => Err(classify_fetch("product", err)),
        }
    }

    /// Whether the product is active with at least `quantity` in stock.
    /// Never fails; lookup problems degrade to `false`.
    pub async fn is_available(&self, product_id: ProductId, quantity: u32) -> bool {
        match self.fetch(product_id).await {
            Ok(product) => product.is_active && product.stock >= i64::from(quantity),
            Err(_) => false,
        }
    }

    /// Adjust remote stock by a signed quantity. Not part of order
    /// verification.
    pub async fn update_stock(
        &self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), GatewayError> {
        self.client
            .post(
                &format!("/products/{product_id}/stock"),
                serde_json::json!({ "quantity": quantity }),
            )
            .await
            .map(|_| ())
            .map_err(|err| {
                tracing::error!("error updating stock for product {product_id}: {err}");
                GatewayError::Upstream {
                    entity: "product",
                    source: err,
                }
            })
    }
}

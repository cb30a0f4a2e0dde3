//! The order verification workflow.
//!
//! One logical flow per creation attempt: probe the user, then each line
//! item in input order, then persist. The checks are strictly sequential and
//! a rejection is terminal for the attempt: nothing is persisted and no
//! stock is reserved or released on either remote service.

use thiserror::Error;

use storefront_client::CallClient;
use storefront_core::{OrderId, StorageError, UserId};
use storefront_orders::{Order, OrderDraft, OrderStatus, OrderStore};

use crate::gateways::{ProductGateway, UserGateway};

/// Boundary failure, classified for the HTTP layer. Raw transport errors
/// never escape: the verification probes fold every upstream failure into
/// the not-found rejection, and anything left is internal.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    IllegalTransition(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for WorkflowError {
    fn from(err: StorageError) -> Self {
        WorkflowError::Internal(err.to_string())
    }
}

/// Sequential check-then-persist state machine for order creation, plus the
/// status operations on persisted orders.
pub struct OrderWorkflow<C, S> {
    users: UserGateway<C>,
    products: ProductGateway<C>,
    store: S,
}

impl<C: CallClient, S: OrderStore> OrderWorkflow<C, S> {
    pub fn new(users: UserGateway<C>, products: ProductGateway<C>, store: S) -> Self {
        Self {
            users,
            products,
            store,
        }
    }

    /// Verify the draft against both collaborator services, then persist.
    pub async fn create_order(&self, draft: OrderDraft) -> Result<Order, WorkflowError> {
        draft
            .validate()
            .map_err(|e| WorkflowError::Validation(e.to_string()))?;

        // Any probe failure counts as an unknown user; the product service
        // is never consulted in that case.
        if self.users.fetch(draft.user_id).await.is_err() {
            tracing::warn!("rejecting order: user {} not found", draft.user_id);
            return Err(WorkflowError::NotFound("User not found".to_string()));
        }

        for item in &draft.items {
            let product = match self.products.fetch(item.product_id).await {
                Ok(product) => product,
                Err(_) => {
                    tracing::warn!("rejecting order: product {} not found", item.product_id);
                    return Err(WorkflowError::NotFound(format!(
                        "Product {} not found",
                        item.product_id
                    )));
                }
            };
            if product.stock < i64::from(item.quantity) {
                tracing::warn!(
                    "rejecting order: insufficient stock for product {}",
                    item.product_id
                );
                return Err(WorkflowError::Validation(format!(
                    "Insufficient stock for product {}",
                    item.product_id
                )));
            }
        }

        let order = self.store.insert(Order::from_draft(draft)).await?;
        tracing::info!("order created successfully: {}", order.id);
        Ok(order)
    }

    pub async fn order(&self, id: OrderId) -> Result<Order, WorkflowError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound("Order not found".to_string()))
    }

    pub async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, WorkflowError> {
        Ok(self.store.find_by_user(user_id).await?)
    }

    /// Replace the status of a persisted order. Any transition is allowed;
    /// only [`OrderWorkflow::cancel`] is guarded.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, WorkflowError> {
        let mut order = self.order(id).await?;
        order.set_status(status);
        let order = self.store.save(order).await?;
        tracing::info!("order {} status updated to {}", order.id, order.status);
        Ok(order)
    }

    /// Cancel a persisted order; completed orders are refused.
    pub async fn cancel(&self, id: OrderId) -> Result<Order, WorkflowError> {
        let mut order = self.order(id).await?;
        order
            .cancel()
            .map_err(|e| WorkflowError::IllegalTransition(e.to_string()))?;
        let order = self.store.save(order).await?;
        tracing::info!("order {} cancelled", order.id);
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use serde_json::{Value, json};

    use storefront_client::RemoteCallError;
    use storefront_core::ProductId;
    use storefront_orders::{InMemoryOrderStore, OrderLineItem};

    use super::*;

    /// Canned-response double for the outbound client. Records every path it
    /// is asked for.
    struct StubClient {
        responses: HashMap<String, Value>,
        calls: Mutex<Vec<String>>,
    }

    impl StubClient {
        fn new(responses: HashMap<String, Value>) -> Self {
            Self {
                responses,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CallClient for StubClient {
        async fn get(&self, path: &str) -> Result<Value, RemoteCallError> {
            self.calls.lock().unwrap().push(path.to_string());
            self.responses
                .get(path)
                .cloned()
                .ok_or_else(|| RemoteCallError::new(404, "Resource not found"))
        }

        async fn post(&self, path: &str, _body: Value) -> Result<Value, RemoteCallError> {
            self.calls.lock().unwrap().push(path.to_string());
            self.responses
                .get(path)
                .cloned()
                .ok_or_else(|| RemoteCallError::new(404, "Resource not found"))
        }
    }

    fn user_json(id: UserId, is_active: bool) -> Value {
        json!({"id": id, "name": "Ada", "email": "ada@example.com", "isActive": is_active})
    }

    fn product_json(id: ProductId, stock: i64, is_active: bool) -> Value {
        json!({
            "id": id,
            "name": "Widget",
            "description": "",
            "price": 10.0,
            "stock": stock,
            "isActive": is_active,
        })
    }

    fn draft(user_id: UserId, items: Vec<OrderLineItem>, total: i64) -> OrderDraft {
        OrderDraft {
            user_id,
            items,
            total_amount: Decimal::from(total),
        }
    }

    fn line(product_id: ProductId, quantity: u32, price: i64) -> OrderLineItem {
        OrderLineItem {
            product_id,
            quantity,
            price: Decimal::from(price),
        }
    }

    fn workflow(
        responses: HashMap<String, Value>,
    ) -> (
        OrderWorkflow<Arc<StubClient>, Arc<InMemoryOrderStore>>,
        Arc<StubClient>,
        Arc<InMemoryOrderStore>,
    ) {
        let client = Arc::new(StubClient::new(responses));
        let store = Arc::new(InMemoryOrderStore::new());
        let wf = OrderWorkflow::new(
            UserGateway::new(client.clone()),
            ProductGateway::new(client.clone()),
            store.clone(),
        );
        (wf, client, store)
    }

    #[tokio::test]
    async fn unknown_user_rejects_before_any_product_probe() {
        let user_id = UserId::new();
        let product_id = ProductId::new();
        let (wf, client, store) = workflow(HashMap::new());

        let err = wf
            .create_order(draft(user_id, vec![line(product_id, 1, 10)], 10))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::NotFound(msg) if msg == "User not found"));
        assert_eq!(client.calls(), vec![format!("/users/{user_id}")]);
        assert!(store.find_by_user(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn short_stock_rejects_with_the_exact_product_id() {
        let user_id = UserId::new();
        let product_id = ProductId::new();
        let responses = HashMap::from([
            (format!("/users/{user_id}"), user_json(user_id, true)),
            (
                format!("/products/{product_id}"),
                product_json(product_id, 1, true),
            ),
        ]);
        let (wf, _client, store) = workflow(responses);

        let err = wf
            .create_order(draft(user_id, vec![line(product_id, 2, 10)], 20))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Validation(msg) if msg == format!("Insufficient stock for product {product_id}")
        ));
        assert!(store.find_by_user(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_product_rejects_with_not_found() {
        let user_id = UserId::new();
        let product_id = ProductId::new();
        let responses = HashMap::from([(format!("/users/{user_id}"), user_json(user_id, true))]);
        let (wf, _client, _store) = workflow(responses);

        let err = wf
            .create_order(draft(user_id, vec![line(product_id, 1, 10)], 10))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::NotFound(msg) if msg == format!("Product {product_id} not found")
        ));
    }

    #[tokio::test]
    async fn verification_stops_at_the_first_failing_item() {
        let user_id = UserId::new();
        let good = ProductId::new();
        let missing = ProductId::new();
        let unreached = ProductId::new();
        let responses = HashMap::from([
            (format!("/users/{user_id}"), user_json(user_id, true)),
            (format!("/products/{good}"), product_json(good, 5, true)),
        ]);
        let (wf, client, _store) = workflow(responses);

        let items = vec![line(good, 1, 10), line(missing, 1, 10), line(unreached, 1, 10)];
        let err = wf.create_order(draft(user_id, items, 30)).await.unwrap_err();

        assert!(matches!(err, WorkflowError::NotFound(_)));
        // Sequential probing: the item after the failure is never fetched.
        assert_eq!(
            client.calls(),
            vec![
                format!("/users/{user_id}"),
                format!("/products/{good}"),
                format!("/products/{missing}"),
            ]
        );
    }

    #[tokio::test]
    async fn verified_draft_is_persisted_as_pending() {
        let user_id = UserId::new();
        let product_id = ProductId::new();
        let responses = HashMap::from([
            (format!("/users/{user_id}"), user_json(user_id, true)),
            (
                format!("/products/{product_id}"),
                product_json(product_id, 5, true),
            ),
        ]);
        let (wf, _client, store) = workflow(responses);

        let order = wf
            .create_order(draft(user_id, vec![line(product_id, 2, 10)], 20))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount, Decimal::from(20));
        assert_eq!(order.items.len(), 1);
        let persisted = store.find_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(persisted, order);
    }

    #[tokio::test]
    async fn cancel_refuses_completed_orders() {
        let user_id = UserId::new();
        let product_id = ProductId::new();
        let responses = HashMap::from([
            (format!("/users/{user_id}"), user_json(user_id, true)),
            (
                format!("/products/{product_id}"),
                product_json(product_id, 5, true),
            ),
        ]);
        let (wf, _client, _store) = workflow(responses);

        let order = wf
            .create_order(draft(user_id, vec![line(product_id, 1, 10)], 10))
            .await
            .unwrap();

        wf.set_status(order.id, OrderStatus::Completed).await.unwrap();
        let err = wf.cancel(order.id).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::IllegalTransition(msg) if msg == "Cannot cancel completed order"
        ));

        // From any other status the cancel goes through.
        let second = wf
            .create_order(draft(user_id, vec![line(product_id, 1, 10)], 10))
            .await
            .unwrap();
        let cancelled = wf.cancel(second.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
    }
}

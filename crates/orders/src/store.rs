//! Persistence port for orders.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use storefront_core::{OrderId, StorageError, UserId};

use crate::order::Order;

/// Storage operations the order service needs. No optimistic-concurrency
/// check: `save` is last-write-wins.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: Order) -> Result<Order, StorageError>;
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StorageError>;
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>, StorageError>;
    async fn save(&self, order: Order) -> Result<Order, StorageError>;
}

#[async_trait]
impl<S> OrderStore for std::sync::Arc<S>
where
    S: OrderStore + ?Sized,
{
    async fn insert(&self, order: Order) -> Result<Order, StorageError> {
        (**self).insert(order).await
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StorageError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>, StorageError> {
        (**self).find_by_user(user_id).await
    }

    async fn save(&self, order: Order) -> Result<Order, StorageError> {
        (**self).save(order).await
    }
}

/// In-memory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    inner: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: Order) -> Result<Order, StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::new("order store lock poisoned"))?;
        map.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::new("order store lock poisoned"))?;
        Ok(map.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::new("order store lock poisoned"))?;
        let mut orders: Vec<Order> = map
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        Ok(orders)
    }

    async fn save(&self, order: Order) -> Result<Order, StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::new("order store lock poisoned"))?;
        map.insert(order.id, order.clone());
        Ok(order)
    }
}

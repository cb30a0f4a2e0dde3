//! Persistence port for the product catalog.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use storefront_core::{ProductId, StorageError};

use crate::product::Product;

/// Storage operations the product service needs.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, product: Product) -> Result<Product, StorageError>;
    async fn find_all(&self) -> Result<Vec<Product>, StorageError>;
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StorageError>;
    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, StorageError>;
    async fn save(&self, product: Product) -> Result<Product, StorageError>;
    /// Returns whether a record was removed.
    async fn delete(&self, id: ProductId) -> Result<bool, StorageError>;
}

/// In-memory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted(mut products: Vec<Product>) -> Vec<Product> {
    products.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
    });
    products
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(&self, product: Product) -> Result<Product, StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::new("product store lock poisoned"))?;
        map.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_all(&self) -> Result<Vec<Product>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::new("product store lock poisoned"))?;
        Ok(sorted(map.values().cloned().collect()))
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::new("product store lock poisoned"))?;
        Ok(map.get(&id).cloned())
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::new("product store lock poisoned"))?;
        Ok(sorted(
            map.values()
                .filter(|p| p.category.as_deref() == Some(category))
                .cloned()
                .collect(),
        ))
    }

    async fn save(&self, product: Product) -> Result<Product, StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::new("product store lock poisoned"))?;
        map.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::new("product store lock poisoned"))?;
        Ok(map.remove(&id).is_some())
    }
}

//! Persistence port for user accounts.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use storefront_core::{StorageError, UserId};

use crate::user::User;

/// Storage operations the user service needs. Document/relational backends
/// live behind this seam; the in-memory store below backs tests and dev.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: User) -> Result<User, StorageError>;
    async fn find_all(&self) -> Result<Vec<User>, StorageError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StorageError>;
    async fn save(&self, user: User) -> Result<User, StorageError>;
    /// Returns whether a record was removed.
    async fn delete(&self, id: UserId) -> Result<bool, StorageError>;
}

/// In-memory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: User) -> Result<User, StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::new("user store lock poisoned"))?;
        map.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<User>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::new("user store lock poisoned"))?;
        let mut users: Vec<User> = map.values().cloned().collect();
        users.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        Ok(users)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::new("user store lock poisoned"))?;
        Ok(map.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::new("user store lock poisoned"))?;
        map.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<bool, StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::new("user store lock poisoned"))?;
        Ok(map.remove(&id).is_some())
    }
}

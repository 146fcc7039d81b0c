use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{StoreError, User, UserStore};

/// Process-local store used when no database is configured, and by tests.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, User>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().await.get(email).cloned())
    }

    async fn create_user(&self, email: &str) -> Result<User, StoreError> {
        let mut users = self.users.lock().await;
        if users.contains_key(email) {
            return Err(StoreError::Conflict);
        }
        let user = User {
            id: Uuid::now_v7(),
            email: email.to_string(),
        };
        users.insert(email.to_string(), user.clone());
        Ok(user)
    }
}

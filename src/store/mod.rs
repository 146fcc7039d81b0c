//! User persistence.
//!
//! Users are keyed uniquely by (normalized) email. Implementations must make
//! `create_user` atomic with respect to that uniqueness: a second create for
//! the same email fails with [`StoreError::Conflict`] instead of producing a
//! duplicate row. The verify-email flow relies on this to stay idempotent
//! under concurrent clicks without taking any locks of its own.

mod memory;
mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user already exists")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Create a user for `email`, failing with `Conflict` if one already exists.
    async fn create_user(&self, email: &str) -> Result<User, StoreError>;
}

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{Account, NewAccount};

/// Errors raised by account persistence
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("account not found")]
    NotFound,

    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    #[error("verification token already in use")]
    DuplicateToken,

    #[error("connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => StoreError::Connection(err.to_string()),
            sqlx::Error::Io(e) => StoreError::Connection(e.to_string()),
            other => StoreError::Sqlx(other),
        }
    }
}

/// Persistence collaborator for accounts.
///
/// Lookups return `StoreError::NotFound` when no row matches. `save` writes
/// the mutable fields (password hash, activation flag, profile) of an
/// existing account and returns the stored row.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Account, StoreError>;

    async fn get_by_email(&self, email: &str) -> Result<Account, StoreError>;

    async fn get_by_token(&self, token: i32) -> Result<Account, StoreError>;

    async fn save(&self, account: &Account) -> Result<Account, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

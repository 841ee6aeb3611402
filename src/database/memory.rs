use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Account, NewAccount};
use super::store::{AccountStore, StoreError};

/// Process-local account store, used in development and by the test suite
#[derive(Clone, Default)]
pub struct MemoryAccountStore {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored account, ordered by creation time
    pub async fn accounts(&self) -> Vec<Account> {
        let accounts = self.accounts.read().await;
        let mut all: Vec<Account> = accounts.values().cloned().collect();
        all.sort_by_key(|a| a.created_at);
        all
    }

    async fn find<F>(&self, predicate: F) -> Result<Account, StoreError>
    where
        F: Fn(&Account) -> bool + Send,
    {
        let accounts = self.accounts.read().await;
        accounts
            .values()
            .find(|a| predicate(a))
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert(&self, new: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.email == new.email) {
            return Err(StoreError::DuplicateEmail(new.email));
        }
        if accounts.values().any(|a| a.token == new.token) {
            return Err(StoreError::DuplicateToken);
        }

        let account = Account::from_new(new);
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Account, StoreError> {
        let accounts = self.accounts.read().await;
        accounts.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> Result<Account, StoreError> {
        self.find(|a| a.email == email).await
    }

    async fn get_by_token(&self, token: i32) -> Result<Account, StoreError> {
        self.find(|a| a.token == token).await
    }

    async fn save(&self, account: &Account) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;
        let stored = accounts.get_mut(&account.id).ok_or(StoreError::NotFound)?;

        stored.password_hash = account.password_hash.clone();
        stored.is_active = account.is_active;
        stored.first_name = account.first_name.clone();
        stored.last_name = account.last_name.clone();
        stored.phone = account.phone.clone();
        stored.country = account.country.clone();
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

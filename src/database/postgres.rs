use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Account, NewAccount};
use super::store::{AccountStore, StoreError};

const ACCOUNT_COLUMNS: &str = r#"
    id, email, password_hash, is_active, token,
    first_name, last_name, phone, country,
    created_at, updated_at
"#;

/// Account store backed by the `accounts` table
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn select_by<T>(&self, column: &str, value: T) -> Result<Account, StoreError>
    where
        T: for<'q> sqlx::Encode<'q, sqlx::Postgres> + sqlx::Type<sqlx::Postgres> + Send + 'static,
    {
        let query = format!("SELECT {} FROM accounts WHERE {} = $1", ACCOUNT_COLUMNS, column);

        sqlx::query_as::<_, Account>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn insert(&self, new: NewAccount) -> Result<Account, StoreError> {
        let account = Account::from_new(new);

        let query = format!(
            r#"
            INSERT INTO accounts (
                id, email, password_hash, is_active, token,
                first_name, last_name, phone, country,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        );

        let result = sqlx::query_as::<_, Account>(&query)
            .bind(account.id)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.is_active)
            .bind(account.token)
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(&account.phone)
            .bind(&account.country)
            .bind(account.created_at)
            .bind(account.updated_at)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                match db_err.constraint() {
                    Some("accounts_token_key") => Err(StoreError::DuplicateToken),
                    _ => Err(StoreError::DuplicateEmail(account.email)),
                }
            }
            Err(other) => Err(other.into()),
        }
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Account, StoreError> {
        self.select_by("id", id).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Account, StoreError> {
        self.select_by("email", email.to_string()).await
    }

    async fn get_by_token(&self, token: i32) -> Result<Account, StoreError> {
        self.select_by("token", token).await
    }

    async fn save(&self, account: &Account) -> Result<Account, StoreError> {
        let query = format!(
            r#"
            UPDATE accounts
            SET password_hash = $2,
                is_active = $3,
                first_name = $4,
                last_name = $5,
                phone = $6,
                country = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        );

        sqlx::query_as::<_, Account>(&query)
            .bind(account.id)
            .bind(&account.password_hash)
            .bind(account.is_active)
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(&account.phone)
            .bind(&account.country)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

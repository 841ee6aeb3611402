// handlers/public/users/login.rs - POST /users/login handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::auth::{
    generate_jwt,
    password::{verify_dummy_password, verify_password},
    Claims,
};
use crate::database::{Account, StoreError};
use crate::error::ApiError;
use crate::forms::LoginForm;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub account: Account,
}

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid email or password")
}

/// POST /users/login - Exchange credentials for a bearer token
///
/// Expected Input:
/// ```json
/// {
///   "email": "jane@example.com",
///   "password": "string"
/// }
/// ```
///
/// Expected Output:
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJhbGciOiJIUzI1NiI...",
///     "token_type": "Bearer",
///     "expires_in": 604800,
///     "account": { "id": "account_uuid", "email": "jane@example.com", ... }
///   }
/// }
/// ```
///
/// Unknown email, wrong password and unverified accounts all produce the
/// same 401 so the response does not reveal which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> ApiResult<LoginResponse> {
    let (email, password) = form.clean()?;

    let account = match state.store.get_by_email(&email).await {
        Ok(account) => account,
        Err(StoreError::NotFound) => {
            verify_dummy_password(&password);
            return Err(invalid_credentials());
        }
        Err(e) => return Err(e.into()),
    };

    if !verify_password(&password, &account.password_hash)? {
        tracing::warn!(account_id = %account.id, "Login failed: wrong password");
        return Err(invalid_credentials());
    }
    if !account.is_active {
        tracing::warn!(account_id = %account.id, "Login failed: account not verified");
        return Err(invalid_credentials());
    }

    let security = &state.config.security;
    let claims = Claims::new(account.id, account.email.clone(), security.jwt_expiry_hours)?;
    let token = generate_jwt(&claims, security)?;
    let expires_in = claims.exp - claims.iat;

    tracing::info!(account_id = %account.id, "Login succeeded");

    Ok(ApiResponse::success(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in,
        account,
    }))
}

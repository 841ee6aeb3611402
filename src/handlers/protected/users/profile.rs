// handlers/protected/users/profile.rs - GET|PUT|PATCH /users/profile handlers

use axum::{extract::State, Extension, Json};

use crate::database::{Account, StoreError};
use crate::error::ApiError;
use crate::forms::ProfileForm;
use crate::middleware::{ApiResponse, ApiResult, AuthAccount};
use crate::state::AppState;

/// The requester's own account; a token for a vanished account is treated as unauthenticated
async fn own_account(state: &AppState, auth: &AuthAccount) -> Result<Account, ApiError> {
    match state.store.get_by_id(auth.account_id).await {
        Ok(account) => Ok(account),
        Err(StoreError::NotFound) => {
            tracing::warn!(account_id = %auth.account_id, "Token refers to a missing account");
            Err(ApiError::unauthorized("Account no longer exists"))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /users/profile - Current account details
pub async fn profile_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
) -> ApiResult<Account> {
    let account = own_account(&state, &auth).await?;
    Ok(ApiResponse::success(account))
}

/// PUT|PATCH /users/profile - Edit profile fields of the current account
///
/// Expected Input (all optional, empty string clears phone/country):
/// ```json
/// {
///   "first_name": "Jane",
///   "last_name": "Doe",
///   "phone": "+31 20 555 0100",
///   "country": "NL"
/// }
/// ```
///
/// The target is always the account named by the bearer token; identifiers
/// in the body are not read.
pub async fn profile_update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Json(form): Json<ProfileForm>,
) -> ApiResult<Account> {
    let changes = form.clean()?;

    let mut account = own_account(&state, &auth).await?;
    account.apply_profile(changes);
    let account = state.store.save(&account).await?;

    tracing::info!(account_id = %account.id, "Profile updated");
    Ok(ApiResponse::success(account))
}

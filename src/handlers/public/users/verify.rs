// handlers/public/users/verify.rs - GET /users/verify/:token handler

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use super::{VERIFICATION_FAILED_PATH, VERIFICATION_SUCCESS_PATH};
use crate::auth::token::parse_verification_token;
use crate::database::StoreError;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /users/verify/:token - Confirm email ownership
///
/// Activates the account holding `token` and redirects to the success page.
/// Unknown or malformed tokens redirect to the failure page without touching
/// any account. Visiting the link again after activation is a no-op that
/// still lands on the success page.
pub async fn verify_email(
    State(state): State<AppState>,
    Path(raw_token): Path<String>,
) -> Result<Redirect, ApiError> {
    let Some(token) = parse_verification_token(&raw_token) else {
        tracing::warn!("Email verification with malformed token");
        return Ok(Redirect::to(VERIFICATION_FAILED_PATH));
    };

    let mut account = match state.store.get_by_token(token).await {
        Ok(account) => account,
        Err(StoreError::NotFound) => {
            tracing::warn!("Email verification with unknown token");
            return Ok(Redirect::to(VERIFICATION_FAILED_PATH));
        }
        Err(e) => return Err(e.into()),
    };

    if account.is_active {
        tracing::debug!(account_id = %account.id, "Verification link reused on active account");
    } else {
        account.is_active = true;
        state.store.save(&account).await?;
        tracing::info!(account_id = %account.id, "Account activated");
    }

    Ok(Redirect::to(VERIFICATION_SUCCESS_PATH))
}

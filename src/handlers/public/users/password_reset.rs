// handlers/public/users/password_reset.rs - POST /users/password-reset handler

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Redirect,
    Json,
};

use super::{PASSWORD_RESET_DONE_PATH, PASSWORD_RESET_FAILED_PATH};
use crate::auth::password::{generate_password, hash_password};
use crate::database::StoreError;
use crate::error::ApiError;
use crate::forms::PasswordResetForm;
use crate::mail::templates;
use crate::state::AppState;

/// POST /users/password-reset - Replace the password and email the new one
///
/// Expected Input:
/// ```json
/// { "email": "jane@example.com" }
/// ```
///
/// Known address: a 12 character password is generated, its hash is saved
/// first and then the plaintext is emailed; redirects to the done page.
/// Unknown or malformed address, or a body that is not JSON: redirects to
/// the failure page and nothing is modified. Mail failure surfaces as a 500
/// after the new password is set.
pub async fn password_reset(
    State(state): State<AppState>,
    payload: Result<Json<PasswordResetForm>, JsonRejection>,
) -> Result<Redirect, ApiError> {
    let form = payload.map(|Json(form)| form).unwrap_or_default();
    let Some(email) = form.clean() else {
        return Ok(Redirect::to(PASSWORD_RESET_FAILED_PATH));
    };

    let mut account = match state.store.get_by_email(&email).await {
        Ok(account) => account,
        Err(StoreError::NotFound) => {
            tracing::warn!("Password reset requested for unknown email");
            return Ok(Redirect::to(PASSWORD_RESET_FAILED_PATH));
        }
        Err(e) => return Err(e.into()),
    };

    let password = generate_password();
    account.password_hash = hash_password(&password)?;
    let account = state.store.save(&account).await?;

    tracing::info!(account_id = %account.id, "Password reset");

    let mail = templates::password_reset_mail(&state.config.mail.from_address, &account.email, &password);
    state.mailer.send(mail).await?;

    Ok(Redirect::to(PASSWORD_RESET_DONE_PATH))
}

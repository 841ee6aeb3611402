// handlers/public/users/register.rs - POST /users/register handler

use axum::{extract::State, Json};

use crate::auth::{password::hash_password, token::generate_verification_token};
use crate::database::{Account, AccountStore, NewAccount, StoreError};
use crate::error::ApiError;
use crate::forms::RegisterForm;
use crate::mail::templates;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Fresh tokens drawn before a collision is treated as a server error
const MAX_TOKEN_ATTEMPTS: usize = 5;

/// POST /users/register - Register a new, inactive account
///
/// Validates the submitted credentials, stores the account with a random
/// verification token and emails an absolute verification link to the
/// registered address. The account cannot log in until the link is visited.
///
/// Expected Input:
/// ```json
/// {
///   "email": "jane@example.com",
///   "password1": "string",
///   "password2": "string"    // Must equal password1
/// }
/// ```
///
/// Expected Output (201):
/// ```json
/// {
///   "success": true,
///   "data": {
///     "id": "account_uuid",
///     "email": "jane@example.com",
///     "is_active": false,
///     "first_name": "",
///     "last_name": "",
///     "phone": null,
///     "country": null,
///     "created_at": "...",
///     "updated_at": "..."
///   }
/// }
/// ```
///
/// A failed verification email fails the request; the account is kept.
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<RegisterForm>,
) -> ApiResult<Account> {
    let registration = form.clean()?;

    match state.store.get_by_email(&registration.email).await {
        Ok(_) => return Err(StoreError::DuplicateEmail(registration.email.clone()).into()),
        Err(StoreError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    let password_hash = hash_password(&registration.password)?;
    let account = insert_with_fresh_token(state.store.as_ref(), registration.email, password_hash).await?;

    tracing::info!(account_id = %account.id, email = %account.email, "Account registered");

    let link = templates::verification_link(&state.config.server.public_url, account.token)?;
    let mail = templates::verification_mail(&state.config.mail.from_address, &account.email, &link);
    state.mailer.send(mail).await?;

    Ok(ApiResponse::created(account))
}

/// Insert the account, redrawing the token whenever it collides with an existing one
async fn insert_with_fresh_token(
    store: &dyn AccountStore,
    email: String,
    password_hash: String,
) -> Result<Account, ApiError> {
    for attempt in 1..=MAX_TOKEN_ATTEMPTS {
        let new_account = NewAccount {
            email: email.clone(),
            password_hash: password_hash.clone(),
            token: generate_verification_token(),
        };

        match store.insert(new_account).await {
            Ok(account) => return Ok(account),
            Err(StoreError::DuplicateToken) => {
                tracing::warn!(attempt, "Verification token collision, drawing a new one");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(StoreError::DuplicateToken.into())
}

// handlers/public/users/pages.rs - Static confirmation pages used as redirect targets

use serde::Serialize;

use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct Page {
    pub page: &'static str,
    pub message: &'static str,
}

fn page(page: &'static str, message: &'static str) -> ApiResult<Page> {
    Ok(ApiResponse::success(Page { page, message }))
}

/// GET /users/verification/success
pub async fn verification_success() -> ApiResult<Page> {
    page("verification_success", "Your email address has been confirmed. You can now log in.")
}

/// GET /users/verification/failed
pub async fn verification_failed() -> ApiResult<Page> {
    page("verification_failed", "This verification link is invalid.")
}

/// GET /users/password-reset/done
pub async fn password_reset_done() -> ApiResult<Page> {
    page("password_reset_done", "A new password has been sent to your email address.")
}

/// GET /users/password-reset/failed
pub async fn password_reset_failed() -> ApiResult<Page> {
    page("password_reset_failed", "We could not reset the password for that address.")
}

// handlers/public/users/mod.rs - Public account handlers
//
// Registration, email verification, password reset and login. None of these
// require a bearer token.

pub mod login;
pub mod pages;
pub mod password_reset;
pub mod register;
pub mod verify;

pub use login::login;
pub use pages::{password_reset_done, password_reset_failed, verification_failed, verification_success};
pub use password_reset::password_reset;
pub use register::register;
pub use verify::verify_email;

// Redirect targets
pub const VERIFICATION_SUCCESS_PATH: &str = "/users/verification/success";
pub const VERIFICATION_FAILED_PATH: &str = "/users/verification/failed";
pub const PASSWORD_RESET_DONE_PATH: &str = "/users/password-reset/done";
pub const PASSWORD_RESET_FAILED_PATH: &str = "/users/password-reset/failed";

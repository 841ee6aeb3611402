//! Password hashing with Argon2id and generation of reset passwords.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use rand::Rng;
use thiserror::Error;

/// Length of passwords issued by the reset flow
pub const GENERATED_PASSWORD_LENGTH: usize = 12;

/// Letters and digits without the easily confused ones (i, l, o, I, O, 0, 1)
const PASSWORD_ALPHABET: &[u8] = b"abcdefghjkmnpqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ23456789";

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("hashing failed: {0}")]
    HashingFailed(String),

    #[error("stored hash is not a valid PHC string")]
    InvalidHashFormat,
}

/// Hash a password into a PHC-formatted Argon2id string
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))
}

/// `Ok(false)` on mismatch, `Err` only when the stored hash is unreadable
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::HashingFailed(e.to_string())),
    }
}

/// Stand-in hash checked when no account matches a login email
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_password("no-such-account").ok());

/// Run a full Argon2 verification against `DUMMY_HASH` and discard the outcome.
/// Unknown emails then take as long to reject as wrong passwords.
pub fn verify_dummy_password(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

/// Random password for the reset flow, drawn from the OS generator
pub fn generate_password() -> String {
    let mut rng = rand::rngs::OsRng;
    (0..GENERATED_PASSWORD_LENGTH)
        .map(|_| PASSWORD_ALPHABET[rng.gen_range(0..PASSWORD_ALPHABET.len())] as char)
        .collect()
}

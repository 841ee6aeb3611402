use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

pub mod password;
pub mod token;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(account_id: Uuid, email: String, expiry_hours: u64) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                JwtError::TokenGeneration(format!("token lifetime of {} hours is out of range", expiry_hours))
            })?
            .timestamp();

        Ok(Self {
            sub: account_id,
            email,
            exp,
            iat: now.timestamp(),
        })
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("{0}")]
    Invalid(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, JwtError> {
    let secret = &security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Validate signature and expiry, returning the decoded claims
pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, JwtError> {
    let secret = &security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| JwtError::Invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn jwt_round_trip_preserves_subject() {
        let security = AppConfig::development().security;
        let id = Uuid::new_v4();

        let token = generate_jwt(&Claims::new(id, "a@example.com".into(), 1).unwrap(), &security).unwrap();
        let claims = validate_jwt(&token, &security).unwrap();

        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "a@example.com");
    }

    #[test]
    fn jwt_rejects_foreign_signature() {
        let mut security = AppConfig::development().security;
        let token = generate_jwt(&Claims::new(Uuid::new_v4(), "a@example.com".into(), 1).unwrap(), &security).unwrap();

        security.jwt_secret = "another-secret".to_string();
        assert!(matches!(validate_jwt(&token, &security), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn jwt_rejects_expired_token() {
        let security = AppConfig::development().security;
        let mut claims = Claims::new(Uuid::new_v4(), "a@example.com".into(), 1).unwrap();
        claims.exp = (Utc::now() - Duration::try_hours(2).unwrap()).timestamp();

        let token = generate_jwt(&claims, &security).unwrap();
        assert!(validate_jwt(&token, &security).is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        let mut security = AppConfig::development().security;
        security.jwt_secret.clear();
        let claims = Claims::new(Uuid::new_v4(), "a@example.com".into(), 1).unwrap();
        assert!(matches!(generate_jwt(&claims, &security), Err(JwtError::InvalidSecret)));
    }

    #[test]
    fn oversized_lifetime_is_an_error_not_a_panic() {
        for hours in [10_000_000_000_000_000, u64::MAX] {
            let result = Claims::new(Uuid::new_v4(), "a@example.com".into(), hours);
            assert!(matches!(result, Err(JwtError::TokenGeneration(_))), "{} hours accepted", hours);
        }
    }
}

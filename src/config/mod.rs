use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Absolute base URL used for links placed in outgoing mail
    pub public_url: String,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MailBackend {
    Smtp,
    Console,
    Memory,
}

impl MailBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "smtp" => Some(MailBackend::Smtp),
            "console" => Some(MailBackend::Console),
            "memory" | "locmem" => Some(MailBackend::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub backend: MailBackend,
    pub from_address: String,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    #[serde(skip_serializing)]
    pub smtp_password: Option<String>,
    pub smtp_timeout_secs: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set")]
    MissingJwtSecret,

    #[error("SMTP_HOST must be set when MAIL_BACKEND=smtp")]
    MissingSmtpHost,

    #[error("PUBLIC_URL is not a valid absolute URL: {0}")]
    InvalidPublicUrl(String),

    #[error("SECURITY_JWT_EXPIRY_HOURS must be between 1 and {max}, got {0}", max = MAX_JWT_EXPIRY_HOURS)]
    InvalidJwtExpiry(u64),

    #[error("MAIL_BACKEND=memory only delivers into the process; use smtp or console outside development")]
    MemoryMailerOutsideDevelopment,
}

/// Longest bearer token lifetime accepted from configuration (one year)
pub const MAX_JWT_EXPIRY_HOURS: u64 = 24 * 365;

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Some(v) = env::var("USERS_API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("PUBLIC_URL") {
            self.server.public_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.server.max_request_size_bytes = v.parse().unwrap_or(self.server.max_request_size_bytes);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        // Mail overrides
        if let Ok(v) = env::var("MAIL_BACKEND") {
            self.mail.backend = MailBackend::parse(&v).unwrap_or(self.mail.backend);
        }
        if let Ok(v) = env::var("MAIL_FROM") {
            self.mail.from_address = v;
        }
        if let Ok(v) = env::var("SMTP_HOST") {
            self.mail.smtp_host = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("SMTP_PORT") {
            self.mail.smtp_port = v.parse().unwrap_or(self.mail.smtp_port);
        }
        if let Ok(v) = env::var("SMTP_USERNAME") {
            self.mail.smtp_username = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("SMTP_PASSWORD") {
            self.mail.smtp_password = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("SMTP_TIMEOUT_SECS") {
            self.mail.smtp_timeout_secs = v.parse().unwrap_or(self.mail.smtp_timeout_secs);
        }

        self
    }

    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }
        if !(1..=MAX_JWT_EXPIRY_HOURS).contains(&self.security.jwt_expiry_hours) {
            return Err(ConfigError::InvalidJwtExpiry(self.security.jwt_expiry_hours));
        }
        if self.mail.backend == MailBackend::Memory && !self.is_development() {
            return Err(ConfigError::MemoryMailerOutsideDevelopment);
        }
        if self.mail.backend == MailBackend::Smtp && self.mail.smtp_host.is_none() {
            return Err(ConfigError::MissingSmtpHost);
        }
        match url::Url::parse(&self.server.public_url) {
            Ok(url) if !url.cannot_be_a_base() => Ok(()),
            _ => Err(ConfigError::InvalidPublicUrl(self.server.public_url.clone())),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                public_url: "http://localhost:3000".to_string(),
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                jwt_secret: "development-secret-change-me".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
            },
            mail: MailConfig {
                backend: MailBackend::Console,
                from_address: "noreply@localhost".to_string(),
                smtp_host: None,
                smtp_port: 587,
                smtp_username: None,
                smtp_password: None,
                smtp_timeout_secs: 10,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                public_url: "https://staging.example.com".to_string(),
                max_request_size_bytes: 512 * 1024,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
            },
            mail: MailConfig {
                backend: MailBackend::Smtp,
                from_address: "noreply@staging.example.com".to_string(),
                smtp_host: None,
                smtp_port: 587,
                smtp_username: None,
                smtp_password: None,
                smtp_timeout_secs: 10,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                public_url: "https://app.example.com".to_string(),
                max_request_size_bytes: 256 * 1024,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
            },
            mail: MailConfig {
                backend: MailBackend::Smtp,
                from_address: "noreply@example.com".to_string(),
                smtp_host: None,
                smtp_port: 587,
                smtp_username: None,
                smtp_password: None,
                smtp_timeout_secs: 10,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.is_development());
        assert_eq!(config.mail.backend, MailBackend::Console);
        assert!(config.database.url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_production_config_requires_secrets() {
        let config = AppConfig::production();
        assert_eq!(config.mail.backend, MailBackend::Smtp);
        assert_eq!(config.validate(), Err(ConfigError::MissingJwtSecret));
    }

    #[test]
    fn test_smtp_backend_requires_host() {
        let mut config = AppConfig::production();
        config.security.jwt_secret = "secret".to_string();
        assert_eq!(config.validate(), Err(ConfigError::MissingSmtpHost));

        config.mail.smtp_host = Some("smtp.example.com".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_relative_public_url() {
        let mut config = AppConfig::development();
        config.server.public_url = "localhost:3000/app".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPublicUrl(_))));
    }

    #[test]
    fn test_mail_backend_parse() {
        assert_eq!(MailBackend::parse("SMTP"), Some(MailBackend::Smtp));
        assert_eq!(MailBackend::parse("locmem"), Some(MailBackend::Memory));
        assert_eq!(MailBackend::parse("carrier-pigeon"), None);
    }

    #[test]
    fn test_jwt_expiry_is_bounded() {
        let mut config = AppConfig::development();
        for hours in [0, MAX_JWT_EXPIRY_HOURS + 1, 10_000_000_000_000_000, u64::MAX] {
            config.security.jwt_expiry_hours = hours;
            assert_eq!(config.validate(), Err(ConfigError::InvalidJwtExpiry(hours)));
        }

        config.security.jwt_expiry_hours = MAX_JWT_EXPIRY_HOURS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_memory_mailer_is_development_only() {
        let mut config = AppConfig::development();
        config.mail.backend = MailBackend::Memory;
        assert!(config.validate().is_ok());

        let mut config = AppConfig::production();
        config.security.jwt_secret = "secret".to_string();
        config.mail.backend = MailBackend::Memory;
        assert_eq!(config.validate(), Err(ConfigError::MemoryMailerOutsideDevelopment));
    }
}

// src/common/config.rs
//! Process configuration
//!
//! Everything the server needs from the environment is read exactly once at
//! startup into an immutable [`AppConfig`]. Components receive it explicitly
//! through [`AppState`](super::AppState); nothing else reads `std::env`.

use std::collections::HashSet;
use std::env;

use chrono::Duration;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://blog.db";
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173/posts";
const DEFAULT_FRONTEND_LOGIN_URL: &str = "http://localhost:5173/login";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
/// One year
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET_KEY must be set to a non-empty value")]
    MissingSigningSecret,

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Deployment environment, controls the `Secure` cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Google OAuth client credentials
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub database_url: String,
    pub reset_db: bool,
    pub admin_emails: HashSet<String>,
    pub google: Option<GoogleOAuthConfig>,
    pub frontend_url: String,
    pub frontend_login_url: String,
    pub cors_origins: Vec<String>,
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Fails when `JWT_SECRET_KEY` is absent or blank: there is no fallback secret.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = non_empty("JWT_SECRET_KEY").ok_or(ConfigError::MissingSigningSecret)?;

        let environment = non_empty("APP_ENV")
            .map(|raw| Environment::parse(&raw))
            .unwrap_or(Environment::Development);

        let token_ttl_hours = match non_empty("TOKEN_TTL_HOURS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|h| (1..=MAX_TOKEN_TTL_HOURS).contains(h))
                .ok_or(ConfigError::InvalidValue {
                    name: "TOKEN_TTL_HOURS",
                    value: raw,
                })?,
            None => DEFAULT_TOKEN_TTL_HOURS,
        };

        let port = match non_empty("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        // Comma-separated so more than one administrator can be configured
        let admin_emails: HashSet<String> = non_empty("ADMIN_EMAIL")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let google = match (non_empty("GOOGLE_CLIENT_ID"), non_empty("GOOGLE_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => Some(GoogleOAuthConfig {
                client_id,
                client_secret,
                callback_url: non_empty("GOOGLE_CALLBACK_URL").unwrap_or_else(|| {
                    format!("http://localhost:{}/auth/google/callback", port)
                }),
            }),
            _ => None,
        };

        let cors_origins = non_empty("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            environment,
            jwt_secret,
            token_ttl: Duration::hours(token_ttl_hours),
            database_url: non_empty("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            reset_db: non_empty("RESET_DB").as_deref() == Some("true"),
            admin_emails,
            google,
            frontend_url: non_empty("FRONTEND_URL")
                .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string()),
            frontend_login_url: non_empty("FRONTEND_LOGIN_URL")
                .unwrap_or_else(|| DEFAULT_FRONTEND_LOGIN_URL.to_string()),
            cors_origins,
            port,
        })
    }

    /// Whether `email` belongs to a configured administrator
    pub fn is_admin(&self, email: &str) -> bool {
        self.admin_emails.contains(&email.trim().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let result = AppConfig::from_lookup(lookup(&[("PORT", "8080")]));
        assert!(matches!(result, Err(ConfigError::MissingSigningSecret)));

        let blank = AppConfig::from_lookup(lookup(&[("JWT_SECRET_KEY", "   ")]));
        assert!(matches!(blank, Err(ConfigError::MissingSigningSecret)));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("JWT_SECRET_KEY", "s3cret")])).unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.token_ttl, Duration::hours(24));
        assert_eq!(config.port, 3000);
        assert!(config.google.is_none());
        assert!(config.admin_emails.is_empty());
        assert!(!config.reset_db);
    }

    #[test]
    fn test_admin_emails_are_normalized() {
        let config = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET_KEY", "s3cret"),
            ("ADMIN_EMAIL", " Admin@Blog.dev , second@blog.dev"),
        ]))
        .unwrap();

        assert!(config.is_admin("admin@blog.dev"));
        assert!(config.is_admin("ADMIN@BLOG.DEV"));
        assert!(config.is_admin("second@blog.dev"));
        assert!(!config.is_admin("someone@blog.dev"));
    }

    #[test]
    fn test_google_requires_id_and_secret() {
        let only_id = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET_KEY", "s3cret"),
            ("GOOGLE_CLIENT_ID", "client"),
        ]))
        .unwrap();
        assert!(only_id.google.is_none());

        let both = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET_KEY", "s3cret"),
            ("GOOGLE_CLIENT_ID", "client"),
            ("GOOGLE_CLIENT_SECRET", "secret"),
            ("APP_ENV", "production"),
        ]))
        .unwrap();
        let google = both.google.expect("google config");
        assert_eq!(google.client_id, "client");
        assert_eq!(google.callback_url, "http://localhost:3000/auth/google/callback");
        assert!(both.environment.is_production());
    }

    #[test]
    fn test_invalid_ttl_rejected() {
        let result = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET_KEY", "s3cret"),
            ("TOKEN_TTL_HOURS", "-3"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name: "TOKEN_TTL_HOURS", .. })
        ));
    }

    #[test]
    fn test_oversized_ttl_rejected() {
        for raw in ["8761", "1000000000000", "9000000000000000"] {
            let result = AppConfig::from_lookup(lookup(&[
                ("JWT_SECRET_KEY", "s3cret"),
                ("TOKEN_TTL_HOURS", raw),
            ]));
            assert!(
                matches!(
                    result,
                    Err(ConfigError::InvalidValue { name: "TOKEN_TTL_HOURS", .. })
                ),
                "TOKEN_TTL_HOURS={}",
                raw
            );
        }

        let year = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET_KEY", "s3cret"),
            ("TOKEN_TTL_HOURS", "8760"),
        ]))
        .expect("one year is accepted");
        assert_eq!(year.token_ttl, Duration::hours(MAX_TOKEN_TTL_HOURS));
    }
}

//! LMS auth service configuration.
//!
//! Configuration is loaded from environment variables. Sensitive fields are
//! redacted in Debug output.

use common::config::ObservabilityConfig;
use common::jwt::{DEFAULT_CLOCK_SKEW, MAX_CLOCK_SKEW};
use common::secret::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";

/// Default session token lifetime (7 days).
pub const DEFAULT_JWT_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Maximum session token lifetime (30 days).
pub const MAX_JWT_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Minimum length of the signing secret in bytes.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// Default database pool size.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// LMS auth service configuration.
#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub database_url: String,

    /// HTTP server bind address.
    pub bind_address: String,

    /// HMAC secret used to sign and verify session tokens.
    pub jwt_secret: SecretString,

    /// Lifetime of issued session tokens in seconds.
    pub jwt_expiry_seconds: i64,

    /// How far in the future a token's `iat` may be.
    pub jwt_clock_skew_seconds: i64,

    /// Maximum connections in the database pool.
    pub database_max_connections: u32,

    /// Log filter and format.
    pub observability: ObservabilityConfig,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiry_seconds", &self.jwt_expiry_seconds)
            .field("jwt_clock_skew_seconds", &self.jwt_clock_skew_seconds)
            .field("database_max_connections", &self.database_max_connections)
            .field("observability", &self.observability)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid JWT secret: {0}")]
    InvalidJwtSecret(String),

    #[error("Invalid JWT expiry configuration: {0}")]
    InvalidJwtExpiry(String),

    #[error("Invalid JWT clock skew configuration: {0}")]
    InvalidJwtClockSkew(String),

    #[error("Invalid database pool configuration: {0}")]
    InvalidDatabasePool(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let jwt_secret = SecretString::from(
            vars.get("JWT_SECRET")
                .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?
                .as_str(),
        );

        if jwt_secret.expose_secret().len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::InvalidJwtSecret(format!(
                "JWT_SECRET must be at least {} bytes",
                MIN_JWT_SECRET_BYTES
            )));
        }

        let jwt_expiry_seconds = if let Some(value_str) = vars.get("JWT_EXPIRY_SECONDS") {
            let value: i64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidJwtExpiry(format!(
                    "JWT_EXPIRY_SECONDS must be a valid integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value <= 0 {
                return Err(ConfigError::InvalidJwtExpiry(format!(
                    "JWT_EXPIRY_SECONDS must be positive, got {}",
                    value
                )));
            }

            if value > MAX_JWT_EXPIRY_SECONDS {
                return Err(ConfigError::InvalidJwtExpiry(format!(
                    "JWT_EXPIRY_SECONDS must not exceed {} seconds, got {}",
                    MAX_JWT_EXPIRY_SECONDS, value
                )));
            }

            value
        } else {
            DEFAULT_JWT_EXPIRY_SECONDS
        };

        let max_clock_skew = i64::try_from(MAX_CLOCK_SKEW.as_secs()).unwrap_or(i64::MAX);
        let jwt_clock_skew_seconds = if let Some(value_str) = vars.get("JWT_CLOCK_SKEW_SECONDS") {
            let value: i64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidJwtClockSkew(format!(
                    "JWT_CLOCK_SKEW_SECONDS must be a valid integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value <= 0 {
                return Err(ConfigError::InvalidJwtClockSkew(format!(
                    "JWT_CLOCK_SKEW_SECONDS must be positive, got {}",
                    value
                )));
            }

            if value > max_clock_skew {
                return Err(ConfigError::InvalidJwtClockSkew(format!(
                    "JWT_CLOCK_SKEW_SECONDS must not exceed {} seconds, got {}",
                    max_clock_skew, value
                )));
            }

            value
        } else {
            i64::try_from(DEFAULT_CLOCK_SKEW.as_secs()).unwrap_or(max_clock_skew)
        };

        let database_max_connections =
            if let Some(value_str) = vars.get("DATABASE_MAX_CONNECTIONS") {
                let value: u32 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidDatabasePool(format!(
                        "DATABASE_MAX_CONNECTIONS must be a valid positive integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if value == 0 {
                    return Err(ConfigError::InvalidDatabasePool(
                        "DATABASE_MAX_CONNECTIONS must be greater than 0".to_string(),
                    ));
                }

                value
            } else {
                DEFAULT_DATABASE_MAX_CONNECTIONS
            };

        Ok(Config {
            database_url,
            bind_address,
            jwt_secret,
            jwt_expiry_seconds,
            jwt_clock_skew_seconds,
            database_max_connections,
            observability: ObservabilityConfig::from_vars(vars),
        })
    }
}

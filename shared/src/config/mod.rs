//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `cache` - Redis configuration
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `notification` - Email/SMS delivery provider
//! - `otp` - Code lifetime, storage backend and cleanup
//! - `rate_limit` - Issuance and verification throttling
//! - `server` - HTTP server and CORS
//! - `shipping` - Courier API credentials and token caching

pub mod cache;
pub mod database;
pub mod environment;
pub mod notification;
pub mod otp;
pub mod rate_limit;
pub mod server;
pub mod shipping;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use notification::{NotificationConfig, NotificationProvider};
pub use otp::{OtpConfig, StoreBackend};
pub use rate_limit::{FailurePolicy, RateLimitConfig, RateLimitStoreBackend, WindowLimit};
pub use server::{CorsConfig, ServerConfig};
pub use shipping::ShippingConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// OTP lifetime and storage
    pub otp: OtpConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,

    /// Notification provider
    pub notification: NotificationConfig,

    /// Courier integration
    pub shipping: ShippingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            cors: CorsConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            otp: OtpConfig::default(),
            rate_limit: RateLimitConfig::default(),
            notification: NotificationConfig::for_environment(env),
            shipping: ShippingConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            cors: CorsConfig::from_env(environment),
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            otp: OtpConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            notification: NotificationConfig::from_env(environment),
            shipping: ShippingConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Reject settings that would make the service misbehave at runtime.
    ///
    /// `from_env` falls back to defaults for unparsable values, but a value
    /// that parses and is out of range only shows up here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.otp.validate()?;
        self.rate_limit.validate()?;
        self.shipping.validate()
    }
}

/// A configuration value outside its allowed range
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be at least {min}, got {value}")]
    TooSmall {
        key: &'static str,
        min: i64,
        value: i64,
    },

    #[error("{0} must be set when {1} is set")]
    Missing(&'static str, &'static str),
}

/// Fails with [`ConfigError::TooSmall`] when `value < min`
pub(crate) fn at_least(key: &'static str, value: i64, min: i64) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::TooSmall { key, min, value });
    }
    Ok(())
}

/// Read an environment variable and parse it, falling back to `default`
/// when it is unset or malformed.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

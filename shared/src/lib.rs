//! Shared utilities and common types for the HampyWorld server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - The error response shape and error codes used on the wire
//! - Identifier validation (email / phone) and masking for logs

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, ConfigError, CorsConfig, DatabaseConfig, Environment, FailurePolicy,
    LogFormat, LoggingConfig, NotificationConfig, NotificationProvider, OtpConfig,
    RateLimitConfig, RateLimitStoreBackend, ServerConfig, ShippingConfig, StoreBackend,
    WindowLimit,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::{mask, validation};

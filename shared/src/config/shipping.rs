//! Courier (Shiprocket) configuration

use serde::{Deserialize, Serialize};

use super::{at_least, env_or, ConfigError};

/// Courier API credentials and token caching
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShippingConfig {
    /// API base URL
    pub base_url: String,

    /// Account email
    pub email: Option<String>,

    /// Account password
    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// Bearer key callers present to read the cached courier token
    #[serde(skip_serializing)]
    pub access_key: Option<String>,

    /// Hours a fetched token is trusted; the provider issues 10-day tokens
    pub token_ttl_hours: i64,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://apiv2.shiprocket.in"),
            email: None,
            password: None,
            access_key: None,
            token_ttl_hours: 9 * 24,
            request_timeout_secs: 30,
        }
    }
}

impl ShippingConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("SHIPROCKET_BASE_URL").unwrap_or(defaults.base_url),
            email: std::env::var("SHIPROCKET_EMAIL").ok(),
            password: std::env::var("SHIPROCKET_PASSWORD").ok(),
            access_key: std::env::var("SHIPPING_ACCESS_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            token_ttl_hours: env_or("SHIPPING_TOKEN_TTL_HOURS", defaults.token_ttl_hours),
            request_timeout_secs: env_or(
                "SHIPPING_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            ),
        }
    }

    /// Whether login credentials are present
    pub fn has_credentials(&self) -> bool {
        self.email.is_some() && self.password.is_some()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least("SHIPPING_TOKEN_TTL_HOURS", self.token_ttl_hours, 1)?;
        if self.has_credentials() && self.access_key.is_none() {
            return Err(ConfigError::Missing("SHIPPING_ACCESS_KEY", "SHIPROCKET_EMAIL"));
        }
        Ok(())
    }
}

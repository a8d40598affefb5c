//! OTP issuance configuration

use serde::{Deserialize, Serialize};

use super::{at_least, env_or, ConfigError};

/// Where OTP records and rate-limit windows live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// MySQL tables `otp_verifications` / `otp_rate_limits`
    Mysql,
    /// Process-local maps, lost on restart
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(StoreBackend::Mysql),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

/// OTP lifetime, storage and housekeeping
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Minutes until an issued code expires
    pub code_ttl_minutes: i64,

    /// Storage backend for OTP records
    pub store: StoreBackend,

    /// Run the periodic purge of stale records
    pub cleanup_enabled: bool,

    /// Seconds between purge runs
    pub cleanup_interval_seconds: u64,

    /// Hours an expired record or elapsed window is kept before purging
    pub retention_hours: i64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: 10,
            store: StoreBackend::Memory,
            cleanup_enabled: true,
            cleanup_interval_seconds: 3600,
            retention_hours: 24,
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            code_ttl_minutes: env_or("OTP_CODE_TTL_MINUTES", defaults.code_ttl_minutes),
            store: env_or("OTP_STORE", defaults.store),
            cleanup_enabled: env_or("OTP_CLEANUP_ENABLED", defaults.cleanup_enabled),
            cleanup_interval_seconds: env_or(
                "OTP_CLEANUP_INTERVAL_SECONDS",
                defaults.cleanup_interval_seconds,
            ),
            retention_hours: env_or("OTP_RETENTION_HOURS", defaults.retention_hours),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least("OTP_CODE_TTL_MINUTES", self.code_ttl_minutes, 1)?;
        at_least("OTP_RETENTION_HOURS", self.retention_hours, 0)?;
        // A zero period would make the purge timer panic
        if self.cleanup_enabled && self.cleanup_interval_seconds == 0 {
            return Err(ConfigError::TooSmall {
                key: "OTP_CLEANUP_INTERVAL_SECONDS",
                min: 1,
                value: 0,
            });
        }
        Ok(())
    }
}

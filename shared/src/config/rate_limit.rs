//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

use super::{at_least, env_or, ConfigError};

/// Fixed-window limit: `max_attempts` per `window_minutes`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct WindowLimit {
    /// Requests allowed inside one window
    pub max_attempts: u32,
    /// Window length in minutes
    pub window_minutes: i64,
}

impl WindowLimit {
    pub const fn new(max_attempts: u32, window_minutes: i64) -> Self {
        Self {
            max_attempts,
            window_minutes,
        }
    }

    /// Window length in seconds
    pub fn window_seconds(&self) -> u64 {
        (self.window_minutes.max(0) as u64) * 60
    }
}

/// What the limiter answers when its store cannot be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Allow the request and log the failure
    Open,
    /// Treat the request as rate limited
    Closed,
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(FailurePolicy::Open),
            "closed" => Ok(FailurePolicy::Closed),
            _ => Err(format!("Invalid failure policy: {}", s)),
        }
    }
}

/// Where rate-limit windows are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitStoreBackend {
    Mysql,
    Redis,
    Memory,
}

impl std::str::FromStr for RateLimitStoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(RateLimitStoreBackend::Mysql),
            "redis" => Ok(RateLimitStoreBackend::Redis),
            "memory" | "in-memory" => Ok(RateLimitStoreBackend::Memory),
            _ => Err(format!("Invalid rate limit store: {}", s)),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// OTP issuance limit per identifier
    pub issuance: WindowLimit,

    /// Verification guesses per identifier; `None` disables the throttle
    pub verification: Option<WindowLimit>,

    /// Behaviour when the store fails
    pub failure_policy: FailurePolicy,

    /// Storage backend for windows
    pub store: RateLimitStoreBackend,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            issuance: WindowLimit::new(3, 60),
            verification: Some(WindowLimit::new(5, 10)),
            failure_policy: FailurePolicy::Closed,
            store: RateLimitStoreBackend::Memory,
        }
    }
}

impl RateLimitConfig {
    /// Create from environment variables
    ///
    /// `OTP_VERIFY_MAX_ATTEMPTS=0` turns verification throttling off.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let issuance = WindowLimit::new(
            env_or("OTP_MAX_REQUESTS", defaults.issuance.max_attempts),
            env_or("OTP_REQUEST_WINDOW_MINUTES", defaults.issuance.window_minutes),
        );

        let verify_default = defaults.verification.unwrap_or(WindowLimit::new(5, 10));
        let verify_max = env_or("OTP_VERIFY_MAX_ATTEMPTS", verify_default.max_attempts);
        let verification = (verify_max > 0).then(|| {
            WindowLimit::new(
                verify_max,
                env_or("OTP_VERIFY_WINDOW_MINUTES", verify_default.window_minutes),
            )
        });

        Self {
            issuance,
            verification,
            failure_policy: env_or("RATE_LIMIT_FAILURE_POLICY", defaults.failure_policy),
            store: env_or("RATE_LIMIT_STORE", defaults.store),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least("OTP_MAX_REQUESTS", i64::from(self.issuance.max_attempts), 1)?;
        at_least("OTP_REQUEST_WINDOW_MINUTES", self.issuance.window_minutes, 1)?;
        if let Some(verification) = self.verification {
            at_least("OTP_VERIFY_WINDOW_MINUTES", verification.window_minutes, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = RateLimitConfig::default();
        assert_eq!(config.issuance, WindowLimit::new(3, 60));
        assert_eq!(config.issuance.window_seconds(), 3600);
        assert_eq!(config.verification, Some(WindowLimit::new(5, 10)));
        assert_eq!(config.failure_policy, FailurePolicy::Closed);
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("OPEN".parse::<FailurePolicy>().unwrap(), FailurePolicy::Open);
        assert!("maybe".parse::<FailurePolicy>().is_err());
        assert_eq!(
            "redis".parse::<RateLimitStoreBackend>().unwrap(),
            RateLimitStoreBackend::Redis
        );
    }

    #[test]
    fn test_validate_limits() {
        assert_eq!(RateLimitConfig::default().validate(), Ok(()));

        let mut config = RateLimitConfig::default();
        config.issuance = WindowLimit::new(0, 60);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooSmall { key: "OTP_MAX_REQUESTS", .. })
        ));

        let mut config = RateLimitConfig::default();
        config.verification = Some(WindowLimit::new(5, -1));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooSmall { key: "OTP_VERIFY_WINDOW_MINUTES", .. })
        ));

        // A disabled throttle has no window to check
        config.verification = None;
        assert_eq!(config.validate(), Ok(()));
    }
}

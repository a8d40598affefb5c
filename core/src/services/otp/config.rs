//! Configuration for the OTP service

use hw_shared::config::{FailurePolicy, OtpConfig, RateLimitConfig, WindowLimit};

use crate::domain::entities::DEFAULT_TTL_MINUTES;

#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Minutes an issued code stays valid
    pub code_ttl_minutes: i64,
    /// Issuance limit per identifier
    pub issuance_limit: WindowLimit,
    /// Verification throttle per identifier, `None` to disable
    pub verification_limit: Option<WindowLimit>,
    pub failure_policy: FailurePolicy,
}

impl OtpServiceConfig {
    pub fn from_app(otp: &OtpConfig, rate_limit: &RateLimitConfig) -> Self {
        Self {
            code_ttl_minutes: otp.code_ttl_minutes,
            issuance_limit: rate_limit.issuance,
            verification_limit: rate_limit.verification,
            failure_policy: rate_limit.failure_policy,
        }
    }
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: DEFAULT_TTL_MINUTES,
            issuance_limit: WindowLimit::new(3, 60),
            verification_limit: Some(WindowLimit::new(5, 10)),
            failure_policy: FailurePolicy::Closed,
        }
    }
}

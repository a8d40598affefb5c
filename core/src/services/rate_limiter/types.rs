use serde::Serialize;

/// Answer to one `check_and_record` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Attempts left in the current window after this one
    pub remaining_attempts: u32,
    /// Set when denied
    pub retry_after_seconds: Option<u64>,
}

impl RateLimitDecision {
    pub fn allow(remaining_attempts: u32) -> Self {
        Self {
            allowed: true,
            remaining_attempts,
            retry_after_seconds: None,
        }
    }

    pub fn deny(retry_after_seconds: u64) -> Self {
        Self {
            allowed: false,
            remaining_attempts: 0,
            retry_after_seconds: Some(retry_after_seconds),
        }
    }
}

//! Results of OTP operations

use chrono::{DateTime, Utc};

/// A code was stored and handed to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpIssued {
    /// Issuance requests left in the current window
    pub remaining_attempts: u32,
    pub expires_at: DateTime<Utc>,
    /// Provider message id
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpVerified {
    pub verified_at: DateTime<Utc>,
}

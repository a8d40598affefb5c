//! Outcomes of OTP issuance and verification that callers must tell apart.

use hw_shared::error_codes;
use thiserror::Error;

use crate::domain::entities::OtpKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Invalid {kind} format")]
    InvalidFormat { kind: OtpKind },

    #[error("Too many OTP requests. Please try again in {retry_after_seconds} seconds")]
    RateLimited { retry_after_seconds: u64 },

    /// `reason` comes from the provider and is for logs only
    #[error("Failed to send {} OTP: {reason}", .kind.channel())]
    DeliveryFailed { kind: OtpKind, reason: String },

    #[error("No OTP found for this identifier")]
    NotFound,

    #[error("OTP has expired")]
    Expired,

    #[error("OTP has already been used")]
    AlreadyUsed,

    #[error("Invalid OTP")]
    Mismatch { remaining_attempts: Option<u32> },
}

impl OtpError {
    /// Stable machine-readable code for this outcome
    pub fn code(&self) -> &'static str {
        match self {
            OtpError::InvalidFormat { .. } => error_codes::INVALID_FORMAT,
            OtpError::RateLimited { .. } => error_codes::RATE_LIMITED,
            OtpError::DeliveryFailed { .. } => error_codes::DELIVERY_FAILED,
            OtpError::NotFound => error_codes::OTP_NOT_FOUND,
            OtpError::Expired => error_codes::OTP_EXPIRED,
            OtpError::AlreadyUsed => error_codes::OTP_ALREADY_USED,
            OtpError::Mismatch { .. } => error_codes::OTP_MISMATCH,
        }
    }
}

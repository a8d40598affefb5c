//! Shared error types and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard error response structure used across all API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details (retry hints, remaining attempts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Error codes used on the wire
pub mod error_codes {
    pub const INVALID_REQUEST: &str = "invalid_request";
    pub const INVALID_FORMAT: &str = "invalid_format";
    pub const RATE_LIMITED: &str = "rate_limited";
    pub const DELIVERY_FAILED: &str = "delivery_failed";
    pub const OTP_NOT_FOUND: &str = "otp_not_found";
    pub const OTP_EXPIRED: &str = "otp_expired";
    pub const OTP_ALREADY_USED: &str = "otp_already_used";
    pub const OTP_MISMATCH: &str = "otp_mismatch";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const SHIPPING_UNAVAILABLE: &str = "shipping_unavailable";
    pub const SHIPPING_AUTH_FAILED: &str = "shipping_auth_failed";
    pub const NOT_FOUND: &str = "not_found";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

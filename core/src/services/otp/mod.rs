//! OTP issuance and verification
//!
//! Issuance validates the identifier, spends one slot of the per-identifier
//! rate limit, stores a fresh record and hands the code to a
//! `NotificationSender`. Verification is throttled per identifier and
//! accepts the latest record for `(identifier, kind)` exactly once.

mod config;
mod service;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use config::OtpServiceConfig;
pub use service::{OtpService, SEND_KEY_PREFIX, VERIFY_KEY_PREFIX};
pub use types::{OtpIssued, OtpVerified};
pub use validation::validate_identifier;

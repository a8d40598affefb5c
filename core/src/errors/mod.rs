//! Domain-specific error types and error handling.

mod types;

pub use types::OtpError;

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to OTP outcomes
    #[error(transparent)]
    Otp(#[from] OtpError),
}

impl DomainError {
    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
        }
    }

    /// The OTP outcome carried by this error, if any
    pub fn as_otp(&self) -> Option<&OtpError> {
        match self {
            DomainError::Otp(e) => Some(e),
            _ => None,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

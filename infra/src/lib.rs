//! # Infrastructure Layer
//!
//! Concrete implementations of the HampyWorld core traits:
//! - **Database**: MySQL repositories using SQLx
//! - **Cache**: Redis-backed rate-limit windows
//! - **Notification**: Brevo email/SMS delivery and a console sender
//! - **Shipping**: courier auth-token cache

use hw_core::errors::DomainError;

pub mod cache;
pub mod database;
pub mod notification;
pub mod shipping;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A stored row could not be mapped back to a domain type
    #[error("Corrupt record: {0}")]
    Mapping(String),

    #[error("External service error: {0}")]
    External(String),
}

impl InfrastructureError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            InfrastructureError::Database(sqlx::Error::Database(db)) => {
                // Deadlock
                db.code().as_deref() == Some("40001")
            }
            InfrastructureError::Database(sqlx::Error::PoolTimedOut)
            | InfrastructureError::Database(sqlx::Error::Io(_)) => true,
            InfrastructureError::Cache(e) => e.is_io_error() || e.is_timeout(),
            InfrastructureError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

impl From<InfrastructureError> for DomainError {
    fn from(e: InfrastructureError) -> Self {
        DomainError::Internal {
            message: e.to_string(),
        }
    }
}

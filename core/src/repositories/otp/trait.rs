//! Persistence contract for issued OTP records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{OtpKind, OtpRecord};
use crate::errors::DomainError;

/// Repository trait for OTP record persistence
///
/// Implementations are shared across request handlers and must be safe to
/// call concurrently.
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Store a freshly issued record
    async fn insert(&self, record: &OtpRecord) -> Result<(), DomainError>;

    /// Most recently created record for `(identifier, kind)`, whatever its state
    async fn find_latest(
        &self,
        identifier: &str,
        kind: OtpKind,
    ) -> Result<Option<OtpRecord>, DomainError>;

    /// Flip `verified` from false to true.
    ///
    /// Returns `false` when the record was already verified or does not
    /// exist, so that two concurrent verifications cannot both succeed.
    async fn mark_verified(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Delete records whose `expires_at` is before `cutoff`
    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError>;
}

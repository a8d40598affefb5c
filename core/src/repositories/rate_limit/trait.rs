//! Persistence contract for fixed-window attempt counters.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::RateLimitRecord;
use crate::errors::DomainError;

/// Result of offering one attempt to a window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The attempt was counted; carries the window after the increment
    Recorded(RateLimitRecord),
    /// The window was already full and nothing changed
    Rejected(RateLimitRecord),
}

impl AttemptOutcome {
    pub fn record(&self) -> &RateLimitRecord {
        match self {
            AttemptOutcome::Recorded(r) | AttemptOutcome::Rejected(r) => r,
        }
    }

    pub fn is_recorded(&self) -> bool {
        matches!(self, AttemptOutcome::Recorded(_))
    }
}

/// Repository trait for rate-limit windows
#[async_trait]
pub trait RateLimitRepository: Send + Sync {
    /// Count one attempt against `identifier`.
    ///
    /// Must be atomic per key: read, compare against `max_attempts` and
    /// write happen as one step so concurrent callers cannot exceed the
    /// limit. A missing or inactive window is replaced by a new one that
    /// starts at `now` with a count of one.
    async fn record_attempt(
        &self,
        identifier: &str,
        now: DateTime<Utc>,
        window: Duration,
        max_attempts: u32,
    ) -> Result<AttemptOutcome, DomainError>;

    /// Delete windows that started before `cutoff`
    async fn delete_windows_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError>;
}

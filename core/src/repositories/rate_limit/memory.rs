//! Process-local rate-limit windows.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::RateLimitRecord;
use crate::errors::DomainError;

use super::r#trait::{AttemptOutcome, RateLimitRepository};

/// In-memory rate-limit repository.
///
/// One window per key; the whole read-compare-write runs under a single lock.
#[derive(Clone, Default)]
pub struct InMemoryRateLimitRepository {
    windows: Arc<Mutex<HashMap<String, RateLimitRecord>>>,
}

impl InMemoryRateLimitRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current window for a key regardless of age
    pub async fn get(&self, identifier: &str) -> Option<RateLimitRecord> {
        self.windows.lock().await.get(identifier).cloned()
    }
}

#[async_trait]
impl RateLimitRepository for InMemoryRateLimitRepository {
    async fn record_attempt(
        &self,
        identifier: &str,
        now: DateTime<Utc>,
        window: Duration,
        max_attempts: u32,
    ) -> Result<AttemptOutcome, DomainError> {
        let mut windows = self.windows.lock().await;

        if let Some(record) = windows.get_mut(identifier) {
            if record.is_active_at(now, window) {
                if record.attempt_count >= max_attempts {
                    return Ok(AttemptOutcome::Rejected(record.clone()));
                }
                record.attempt_count += 1;
                return Ok(AttemptOutcome::Recorded(record.clone()));
            }
        }

        let record = RateLimitRecord::open(identifier, now);
        windows.insert(identifier.to_string(), record.clone());
        Ok(AttemptOutcome::Recorded(record))
    }

    async fn delete_windows_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, r| r.window_start >= cutoff);
        Ok((before - windows.len()) as u64)
    }
}

//! Fixed-window attempt counter for one rate-limit key.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Attempts counted against a key since `window_start`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRecord {
    pub id: Uuid,
    /// Rate-limit key, e.g. an email address or `verify:<identifier>`
    pub identifier: String,
    pub window_start: DateTime<Utc>,
    pub attempt_count: u32,
}

impl RateLimitRecord {
    /// Opens a window at `now` holding its first attempt
    pub fn open(identifier: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            identifier: identifier.into(),
            window_start: now,
            attempt_count: 1,
        }
    }

    /// A window is active while `window_start >= now - window`
    pub fn is_active_at(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.window_start >= now - window
    }

    pub fn window_end(&self, window: Duration) -> DateTime<Utc> {
        self.window_start + window
    }

    /// Whole seconds until the window closes, never less than one
    pub fn retry_after_seconds(&self, now: DateTime<Utc>, window: Duration) -> u64 {
        let remaining = self.window_end(window) - now;
        let millis = remaining.num_milliseconds().max(0) as u64;
        millis.div_ceil(1000).max(1)
    }

    pub fn remaining(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempt_count)
    }
}

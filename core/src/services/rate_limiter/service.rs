//! Rate limiter over a `RateLimitRepository`

use chrono::Duration;
use std::sync::Arc;

use hw_shared::config::{FailurePolicy, WindowLimit};
use hw_shared::utils::mask::mask_identifier;

use crate::errors::{DomainError, DomainResult};
use crate::repositories::{AttemptOutcome, RateLimitRepository};
use crate::services::clock::Clock;

use super::types::RateLimitDecision;

/// Counts attempts per key inside fixed windows
pub struct RateLimiter {
    repository: Arc<dyn RateLimitRepository>,
    clock: Arc<dyn Clock>,
    failure_policy: FailurePolicy,
}

impl RateLimiter {
    pub fn new(
        repository: Arc<dyn RateLimitRepository>,
        clock: Arc<dyn Clock>,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self {
            repository,
            clock,
            failure_policy,
        }
    }

    /// Count one attempt for `identifier` against `limit`.
    ///
    /// Denied attempts are not counted. When the store fails the answer
    /// follows the configured failure policy instead of an error.
    pub async fn check_and_record(
        &self,
        identifier: &str,
        limit: WindowLimit,
    ) -> DomainResult<RateLimitDecision> {
        if identifier.is_empty() {
            return Err(DomainError::validation("Rate limit key must not be empty"));
        }
        if limit.max_attempts == 0 {
            return Err(DomainError::validation("max_attempts must be at least 1"));
        }
        if limit.window_minutes <= 0 {
            return Err(DomainError::validation("window_minutes must be positive"));
        }

        let now = self.clock.now();
        let window = Duration::minutes(limit.window_minutes);

        match self
            .repository
            .record_attempt(identifier, now, window, limit.max_attempts)
            .await
        {
            Ok(AttemptOutcome::Recorded(record)) => {
                Ok(RateLimitDecision::allow(record.remaining(limit.max_attempts)))
            }
            Ok(AttemptOutcome::Rejected(record)) => {
                let retry_after = record.retry_after_seconds(now, window);
                tracing::warn!(
                    identifier = %mask_identifier(identifier),
                    attempt_count = record.attempt_count,
                    retry_after_seconds = retry_after,
                    event = "rate_limit_exceeded",
                    "Rate limit exceeded"
                );
                Ok(RateLimitDecision::deny(retry_after))
            }
            Err(e) => match self.failure_policy {
                FailurePolicy::Open => {
                    tracing::warn!(
                        identifier = %mask_identifier(identifier),
                        error = %e,
                        event = "rate_limit_store_failed",
                        policy = "open",
                        "Rate limit store unavailable, allowing request"
                    );
                    Ok(RateLimitDecision::allow(limit.max_attempts))
                }
                FailurePolicy::Closed => {
                    tracing::error!(
                        identifier = %mask_identifier(identifier),
                        error = %e,
                        event = "rate_limit_store_failed",
                        policy = "closed",
                        "Rate limit store unavailable, denying request"
                    );
                    Ok(RateLimitDecision::deny(limit.window_seconds()))
                }
            },
        }
    }
}

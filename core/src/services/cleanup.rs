//! Periodic removal of stale OTP records and rate-limit windows.

use chrono::Duration;
use std::sync::Arc;
use tracing::{error, info, warn};

use hw_shared::config::OtpConfig;

use crate::errors::DomainError;
use crate::repositories::{OtpRepository, RateLimitRepository};
use crate::services::clock::Clock;

/// Configuration for the cleanup service
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// How long rows are kept after they stop mattering (in hours)
    pub retention_hours: i64,
    pub enabled: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            retention_hours: 24,
            enabled: true,
        }
    }
}

impl From<&OtpConfig> for CleanupConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            interval_seconds: config.cleanup_interval_seconds,
            retention_hours: config.retention_hours,
            enabled: config.cleanup_enabled,
        }
    }
}

/// Deletes OTP records and rate-limit windows older than the retention period
pub struct OtpCleanupService {
    otp_repository: Arc<dyn OtpRepository>,
    rate_limit_repository: Arc<dyn RateLimitRepository>,
    clock: Arc<dyn Clock>,
    config: CleanupConfig,
}

impl OtpCleanupService {
    pub fn new(
        otp_repository: Arc<dyn OtpRepository>,
        rate_limit_repository: Arc<dyn RateLimitRepository>,
        clock: Arc<dyn Clock>,
        config: CleanupConfig,
    ) -> Self {
        Self {
            otp_repository,
            rate_limit_repository,
            clock,
            config,
        }
    }

    /// Run a single cleanup cycle.
    ///
    /// A failing store is recorded in the result; the other store is still
    /// cleaned.
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let cutoff = self.clock.now() - Duration::hours(self.config.retention_hours);
        let mut result = CleanupResult::default();

        match self.otp_repository.delete_expired_before(cutoff).await {
            Ok(count) => result.otp_records_deleted = count,
            Err(e) => {
                error!(error = %e, event = "otp_cleanup_failed", "Failed to delete expired OTP records");
                result.errors.push(format!("OTP cleanup error: {}", e));
            }
        }

        match self.rate_limit_repository.delete_windows_before(cutoff).await {
            Ok(count) => result.rate_limit_windows_deleted = count,
            Err(e) => {
                error!(error = %e, event = "rate_limit_cleanup_failed", "Failed to delete rate limit windows");
                result.errors.push(format!("Rate limit cleanup error: {}", e));
            }
        }

        info!(
            otp_records_deleted = result.otp_records_deleted,
            rate_limit_windows_deleted = result.rate_limit_windows_deleted,
            event = "cleanup_completed",
            "OTP cleanup completed"
        );

        Ok(result)
    }

    /// Run cleanup on an interval in a background task
    pub fn spawn(self: Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enabled {
            warn!("OTP cleanup service is disabled");
            return None;
        }

        let period = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "OTP cleanup service started"
            );

            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;

                match self.run_cleanup().await {
                    Ok(result) if !result.is_success() => {
                        warn!("Cleanup completed with errors: {:?}", result.errors);
                    }
                    Ok(_) => {}
                    Err(e) => error!("OTP cleanup cycle failed: {}", e),
                }
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    pub otp_records_deleted: u64,
    pub rate_limit_windows_deleted: u64,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn total_cleaned(&self) -> u64 {
        self.otp_records_deleted + self.rate_limit_windows_deleted
    }
}

//! Main OTP service implementation

use std::sync::Arc;

use hw_shared::utils::mask::mask_identifier;

use crate::domain::entities::{OtpKind, OtpRecord};
use crate::errors::{DomainError, DomainResult, OtpError};
use crate::repositories::{OtpRepository, RateLimitRepository};
use crate::services::clock::Clock;
use crate::services::notification::NotificationSender;
use crate::services::rate_limiter::RateLimiter;

use super::config::OtpServiceConfig;
use super::types::{OtpIssued, OtpVerified};
use super::validation::validate_identifier;

/// Prefix of the rate-limit key used to throttle issuance
pub const SEND_KEY_PREFIX: &str = "send:";

/// Prefix of the rate-limit key used to throttle verification guesses
pub const VERIFY_KEY_PREFIX: &str = "verify:";

/// Issues and verifies one-time passwords
pub struct OtpService {
    otp_repository: Arc<dyn OtpRepository>,
    rate_limiter: RateLimiter,
    notifier: Arc<dyn NotificationSender>,
    clock: Arc<dyn Clock>,
    config: OtpServiceConfig,
}

impl OtpService {
    pub fn new(
        otp_repository: Arc<dyn OtpRepository>,
        rate_limit_repository: Arc<dyn RateLimitRepository>,
        notifier: Arc<dyn NotificationSender>,
        clock: Arc<dyn Clock>,
        config: OtpServiceConfig,
    ) -> Self {
        let rate_limiter = RateLimiter::new(rate_limit_repository, clock.clone(), config.failure_policy);
        Self {
            otp_repository,
            rate_limiter,
            notifier,
            clock,
            config,
        }
    }

    /// Issue a code to `identifier` and deliver it.
    ///
    /// Order matters: a malformed identifier never touches the rate limiter
    /// or the store, and once a slot is spent it is not refunded, even when
    /// storage or delivery fails afterwards.
    pub async fn request_otp(&self, identifier: &str, kind: OtpKind) -> DomainResult<OtpIssued> {
        let masked = mask_identifier(identifier);

        if let Err(e) = validate_identifier(identifier, kind) {
            tracing::info!(
                identifier = %masked,
                kind = %kind,
                event = "otp_invalid_format",
                "Rejected OTP request with malformed identifier"
            );
            return Err(e.into());
        }

        // Both windows share one store, so every key carries its purpose.
        let key = format!("{}{}", SEND_KEY_PREFIX, identifier);
        let decision = self
            .rate_limiter
            .check_and_record(&key, self.config.issuance_limit)
            .await?;
        if !decision.allowed {
            return Err(OtpError::RateLimited {
                retry_after_seconds: decision
                    .retry_after_seconds
                    .unwrap_or_else(|| self.config.issuance_limit.window_seconds()),
            }
            .into());
        }

        let record = OtpRecord::issue(identifier, kind, self.clock.now(), self.config.code_ttl_minutes);

        self.otp_repository.insert(&record).await.map_err(|e| {
            tracing::error!(
                identifier = %masked,
                error = %e,
                event = "otp_storage_failed",
                "Failed to store OTP"
            );
            DomainError::internal("Failed to store OTP. Please try again")
        })?;

        tracing::info!(
            identifier = %masked,
            kind = %kind,
            otp_id = %record.id,
            event = "otp_generated",
            "Generated OTP"
        );

        let message_id = self
            .notifier
            .send(identifier, kind, &record.code, self.config.code_ttl_minutes)
            .await
            .map_err(|reason| {
                tracing::error!(
                    identifier = %masked,
                    provider = self.notifier.provider_name(),
                    reason = %reason,
                    event = "otp_delivery_failed",
                    "Failed to deliver OTP"
                );
                OtpError::DeliveryFailed { kind, reason }
            })?;

        tracing::info!(
            identifier = %masked,
            provider = self.notifier.provider_name(),
            message_id = %message_id,
            remaining_attempts = decision.remaining_attempts,
            event = "otp_sent",
            "OTP delivered"
        );

        Ok(OtpIssued {
            remaining_attempts: decision.remaining_attempts,
            expires_at: record.expires_at,
            message_id,
        })
    }

    /// Check `submitted_code` against the latest code issued to `identifier`.
    ///
    /// Failures are reported in the order throttle, missing record, expiry,
    /// prior use, mismatch.
    pub async fn verify_otp(
        &self,
        identifier: &str,
        submitted_code: &str,
        kind: OtpKind,
    ) -> DomainResult<OtpVerified> {
        let masked = mask_identifier(identifier);

        let remaining_attempts = match self.config.verification_limit {
            Some(limit) => {
                let key = format!("{}{}", VERIFY_KEY_PREFIX, identifier);
                let decision = self.rate_limiter.check_and_record(&key, limit).await?;
                if !decision.allowed {
                    return Err(OtpError::RateLimited {
                        retry_after_seconds: decision
                            .retry_after_seconds
                            .unwrap_or_else(|| limit.window_seconds()),
                    }
                    .into());
                }
                Some(decision.remaining_attempts)
            }
            None => None,
        };

        let record = self
            .otp_repository
            .find_latest(identifier, kind)
            .await?
            .ok_or(OtpError::NotFound)?;

        let now = self.clock.now();
        if let Err(e) = record.check(submitted_code, now) {
            let e = match e {
                OtpError::Mismatch { .. } => OtpError::Mismatch { remaining_attempts },
                other => other,
            };
            tracing::info!(
                identifier = %masked,
                otp_id = %record.id,
                outcome = e.code(),
                event = "otp_verification_failed",
                "OTP verification failed"
            );
            return Err(e.into());
        }

        if !self.otp_repository.mark_verified(record.id).await? {
            tracing::warn!(
                identifier = %masked,
                otp_id = %record.id,
                event = "otp_verification_race_lost",
                "OTP was verified concurrently"
            );
            return Err(OtpError::AlreadyUsed.into());
        }

        tracing::info!(
            identifier = %masked,
            otp_id = %record.id,
            event = "otp_verified",
            "OTP verified"
        );

        Ok(OtpVerified { verified_at: now })
    }
}

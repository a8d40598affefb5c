//! Unit tests for OTP issuance

use chrono::Duration;

use crate::domain::entities::{OtpKind, CODE_LENGTH};
use crate::errors::{DomainError, OtpError};
use crate::repositories::OtpRepository;
use crate::services::otp::OtpServiceConfig;

use super::mocks::{harness, harness_with, MockSender, SpyOtpRepository};

#[tokio::test]
async fn test_request_otp_success() {
    let h = harness();

    let issued = h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap();
    assert_eq!(issued.remaining_attempts, 2);
    assert_eq!(issued.expires_at, h.clock_now() + Duration::minutes(10));
    assert!(issued.message_id.starts_with("mock-msg-"));

    let sent = h.sender.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].identifier, "user@example.com");
    assert_eq!(sent[0].kind, OtpKind::Email);
    assert_eq!(sent[0].code.len(), CODE_LENGTH);

    let stored = h
        .otp_repo
        .inner
        .find_latest("user@example.com", OtpKind::Email)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.code, sent[0].code);
    assert!(!stored.verified);
}

#[tokio::test]
async fn test_remaining_attempts_count_down_for_phone() {
    let h = harness();

    let mut remaining = Vec::new();
    for _ in 0..3 {
        let issued = h.service.request_otp("+14155552671", OtpKind::Phone).await.unwrap();
        remaining.push(issued.remaining_attempts);
    }
    assert_eq!(remaining, vec![2, 1, 0]);

    let err = h.service.request_otp("+14155552671", OtpKind::Phone).await.unwrap_err();
    assert_eq!(
        err,
        DomainError::Otp(OtpError::RateLimited { retry_after_seconds: 3600 })
    );
    assert_eq!(h.sender.sent_count(), 3);
}

#[tokio::test]
async fn test_rate_limit_resets_after_window() {
    let h = harness();
    for _ in 0..3 {
        h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap();
    }
    assert!(h.service.request_otp("user@example.com", OtpKind::Email).await.is_err());

    h.clock.advance(Duration::minutes(61));
    let issued = h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap();
    assert_eq!(issued.remaining_attempts, 2);
}

#[tokio::test]
async fn test_invalid_format_touches_nothing() {
    let h = harness();

    let err = h.service.request_otp("not-an-email", OtpKind::Email).await.unwrap_err();
    assert_eq!(err, DomainError::Otp(OtpError::InvalidFormat { kind: OtpKind::Email }));

    let err = h.service.request_otp("123", OtpKind::Phone).await.unwrap_err();
    assert_eq!(err, DomainError::Otp(OtpError::InvalidFormat { kind: OtpKind::Phone }));

    assert_eq!(h.limits.calls(), 0);
    assert_eq!(h.otp_repo.calls(), 0);
    assert_eq!(h.sender.sent_count(), 0);
}

#[tokio::test]
async fn test_delivery_failure_keeps_record_and_slot() {
    let h = harness_with(
        SpyOtpRepository::default(),
        MockSender::new(true),
        OtpServiceConfig::default(),
    );

    let err = h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap_err();
    match err {
        DomainError::Otp(OtpError::DeliveryFailed { kind, reason }) => {
            assert_eq!(kind, OtpKind::Email);
            assert!(reason.contains("503"));
        }
        other => panic!("Expected delivery failure, got {:?}", other),
    }

    assert_eq!(h.otp_repo.inner.len().await, 1);
    let window = h.limits.inner.get("send:user@example.com").await.unwrap();
    assert_eq!(window.attempt_count, 1);
}

#[tokio::test]
async fn test_store_failure_is_internal_and_slot_not_refunded() {
    let h = harness_with(
        SpyOtpRepository::failing(),
        MockSender::new(false),
        OtpServiceConfig::default(),
    );

    let err = h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap_err();
    assert!(matches!(err, DomainError::Internal { .. }));
    assert_eq!(h.sender.sent_count(), 0);

    let window = h.limits.inner.get("send:user@example.com").await.unwrap();
    assert_eq!(window.attempt_count, 1);
}

#[tokio::test]
async fn test_custom_ttl() {
    let config = OtpServiceConfig {
        code_ttl_minutes: 3,
        ..OtpServiceConfig::default()
    };
    let h = harness_with(SpyOtpRepository::default(), MockSender::new(false), config);

    let issued = h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap();
    assert_eq!(issued.expires_at, h.clock_now() + Duration::minutes(3));
}

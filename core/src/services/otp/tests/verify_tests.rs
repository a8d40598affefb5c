//! Unit tests for OTP verification

use chrono::Duration;

use crate::domain::entities::OtpKind;
use crate::errors::{DomainError, OtpError};
use crate::repositories::OtpRepository;
use crate::services::otp::OtpServiceConfig;
use hw_shared::config::WindowLimit;

use super::mocks::{harness, harness_with, MockSender, SpyOtpRepository};

fn otp_err(result: Result<impl std::fmt::Debug, DomainError>) -> OtpError {
    match result {
        Err(DomainError::Otp(e)) => e,
        other => panic!("Expected OTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_verify_success_then_already_used() {
    let h = harness();
    h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap();
    let code = h.sender.last_code().unwrap();

    let verified = h
        .service
        .verify_otp("user@example.com", &code, OtpKind::Email)
        .await
        .unwrap();
    assert_eq!(verified.verified_at, h.clock_now());

    let err = otp_err(h.service.verify_otp("user@example.com", &code, OtpKind::Email).await);
    assert_eq!(err, OtpError::AlreadyUsed);
}

#[tokio::test]
async fn test_verify_not_found() {
    let h = harness();
    let err = otp_err(h.service.verify_otp("nobody@example.com", "123456", OtpKind::Email).await);
    assert_eq!(err, OtpError::NotFound);
}

#[tokio::test]
async fn test_verify_kind_must_match() {
    let h = harness();
    h.service.request_otp("+14155552671", OtpKind::Phone).await.unwrap();
    let code = h.sender.last_code().unwrap();

    let err = otp_err(h.service.verify_otp("+14155552671", &code, OtpKind::Email).await);
    assert_eq!(err, OtpError::NotFound);
}

#[tokio::test]
async fn test_verify_expired_after_ttl() {
    let h = harness();
    h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap();
    let code = h.sender.last_code().unwrap();

    h.clock.advance(Duration::minutes(10) + Duration::seconds(1));

    let err = otp_err(h.service.verify_otp("user@example.com", &code, OtpKind::Email).await);
    assert_eq!(err, OtpError::Expired);
}

#[tokio::test]
async fn test_verify_at_exact_expiry_succeeds() {
    let h = harness();
    h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap();
    let code = h.sender.last_code().unwrap();

    h.clock.advance(Duration::minutes(10));
    assert!(h.service.verify_otp("user@example.com", &code, OtpKind::Email).await.is_ok());
}

#[tokio::test]
async fn test_mismatch_leaves_record_usable() {
    let h = harness();
    h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap();
    let code = h.sender.last_code().unwrap();

    let err = otp_err(
        h.service
            .verify_otp("user@example.com", "000000", OtpKind::Email)
            .await,
    );
    assert_eq!(err, OtpError::Mismatch { remaining_attempts: Some(4) });

    let stored = h
        .otp_repo
        .inner
        .find_latest("user@example.com", OtpKind::Email)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.verified);

    assert!(h.service.verify_otp("user@example.com", &code, OtpKind::Email).await.is_ok());
}

#[tokio::test]
async fn test_latest_code_supersedes_earlier() {
    let h = harness();
    h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap();
    let first = h.sender.last_code().unwrap();
    h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap();
    let second = h.sender.last_code().unwrap();

    if first != second {
        let err = otp_err(h.service.verify_otp("user@example.com", &first, OtpKind::Email).await);
        assert!(matches!(err, OtpError::Mismatch { .. }));
    }
    assert!(h.service.verify_otp("user@example.com", &second, OtpKind::Email).await.is_ok());
}

#[tokio::test]
async fn test_verification_throttle() {
    let h = harness();
    h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap();
    let code = h.sender.last_code().unwrap();

    // Issued codes never start with zero
    let mut remaining = Vec::new();
    for _ in 0..5 {
        match otp_err(h.service.verify_otp("user@example.com", "000000", OtpKind::Email).await) {
            OtpError::Mismatch { remaining_attempts } => remaining.push(remaining_attempts),
            other => panic!("Expected mismatch, got {:?}", other),
        }
    }
    assert_eq!(remaining, vec![Some(4), Some(3), Some(2), Some(1), Some(0)]);

    // Even the right code is refused while throttled
    let err = otp_err(h.service.verify_otp("user@example.com", &code, OtpKind::Email).await);
    assert_eq!(err, OtpError::RateLimited { retry_after_seconds: 600 });

    h.clock.advance(Duration::minutes(9));
    let err = otp_err(h.service.verify_otp("user@example.com", &code, OtpKind::Email).await);
    assert_eq!(err, OtpError::RateLimited { retry_after_seconds: 60 });

    // The first code has expired by the time the throttle lifts
    h.clock.advance(Duration::seconds(61));
    h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap();
    let fresh = h.sender.last_code().unwrap();
    assert!(h.service.verify_otp("user@example.com", &fresh, OtpKind::Email).await.is_ok());
}

#[tokio::test]
async fn test_verification_throttle_does_not_consume_issuance() {
    let h = harness();
    h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap();
    for _ in 0..5 {
        let _ = h.service.verify_otp("user@example.com", "000000", OtpKind::Email).await;
    }

    let issued = h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap();
    assert_eq!(issued.remaining_attempts, 1);
}

#[tokio::test]
async fn test_issuing_to_prefixed_address_leaves_verify_budget_alone() {
    let h = harness();
    h.service.request_otp("victim@example.com", OtpKind::Email).await.unwrap();
    let code = h.sender.last_code().unwrap();

    // "verify:victim@example.com" is a well-formed email address
    for _ in 0..3 {
        h.service
            .request_otp("verify:victim@example.com", OtpKind::Email)
            .await
            .unwrap();
    }

    let err = otp_err(
        h.service
            .verify_otp("victim@example.com", "000000", OtpKind::Email)
            .await,
    );
    assert_eq!(err, OtpError::Mismatch { remaining_attempts: Some(4) });
    assert!(h.service.verify_otp("victim@example.com", &code, OtpKind::Email).await.is_ok());

    let issuance = h.limits.inner.get("send:verify:victim@example.com").await.unwrap();
    assert_eq!(issuance.attempt_count, 3);
    let guesses = h.limits.inner.get("verify:victim@example.com").await.unwrap();
    assert_eq!(guesses.attempt_count, 2);
}

#[tokio::test]
async fn test_throttle_disabled() {
    let config = OtpServiceConfig {
        verification_limit: None,
        ..OtpServiceConfig::default()
    };
    let h = harness_with(SpyOtpRepository::default(), MockSender::new(false), config);
    h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap();
    let code = h.sender.last_code().unwrap();

    for _ in 0..20 {
        let err = otp_err(
            h.service
                .verify_otp("user@example.com", "000000", OtpKind::Email)
                .await,
        );
        assert_eq!(err, OtpError::Mismatch { remaining_attempts: None });
    }
    assert!(h.service.verify_otp("user@example.com", &code, OtpKind::Email).await.is_ok());
}

#[tokio::test]
async fn test_custom_verification_limit() {
    let config = OtpServiceConfig {
        verification_limit: Some(WindowLimit::new(1, 5)),
        ..OtpServiceConfig::default()
    };
    let h = harness_with(SpyOtpRepository::default(), MockSender::new(false), config);
    h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap();

    let err = otp_err(h.service.verify_otp("user@example.com", "000000", OtpKind::Email).await);
    assert!(matches!(err, OtpError::Mismatch { remaining_attempts: Some(0) }));
    let err = otp_err(h.service.verify_otp("user@example.com", "000000", OtpKind::Email).await);
    assert_eq!(err, OtpError::RateLimited { retry_after_seconds: 300 });
}

#[tokio::test]
async fn test_concurrent_verification_single_winner() {
    use std::sync::Arc;

    let h = harness();
    h.service.request_otp("user@example.com", OtpKind::Email).await.unwrap();
    let code = h.sender.last_code().unwrap();
    let service = Arc::new(h.service);

    let mut handles = Vec::new();
    for _ in 0..4 {
        let service = service.clone();
        let code = code.clone();
        handles.push(tokio::spawn(async move {
            service.verify_otp("user@example.com", &code, OtpKind::Email).await
        }));
    }

    let mut ok = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(e) => assert_eq!(e, DomainError::Otp(OtpError::AlreadyUsed)),
        }
    }
    assert_eq!(ok, 1);
}

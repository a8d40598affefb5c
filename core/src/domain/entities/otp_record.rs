//! One-time password record issued to an email address or phone number.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::OtpError;

/// Length of every issued code
pub const CODE_LENGTH: usize = 6;

/// Default lifetime of an issued code
pub const DEFAULT_TTL_MINUTES: i64 = 10;

const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

/// Delivery channel an OTP is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpKind {
    Email,
    Phone,
}

impl OtpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpKind::Email => "email",
            OtpKind::Phone => "phone",
        }
    }

    /// Human-facing channel name used in delivery failure messages
    pub fn channel(&self) -> &'static str {
        match self {
            OtpKind::Email => "email",
            OtpKind::Phone => "SMS",
        }
    }
}

impl fmt::Display for OtpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OtpKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(OtpKind::Email),
            "phone" => Ok(OtpKind::Phone),
            _ => Err(format!("Invalid OTP type: {}", s)),
        }
    }
}

/// A stored one-time password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    pub id: Uuid,

    /// Email address or phone number exactly as submitted
    pub identifier: String,

    /// Six decimal digits, first digit non-zero
    pub code: String,

    pub kind: OtpKind,

    pub expires_at: DateTime<Utc>,

    /// Set once, by the first successful verification
    pub verified: bool,

    pub created_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Issues a fresh record with a random code valid for `ttl_minutes` from `now`
    pub fn issue(identifier: impl Into<String>, kind: OtpKind, now: DateTime<Utc>, ttl_minutes: i64) -> Self {
        Self::with_code(identifier, kind, Self::generate_code(), now, ttl_minutes)
    }

    /// Builds a record around a known code
    pub fn with_code(
        identifier: impl Into<String>,
        kind: OtpKind,
        code: impl Into<String>,
        now: DateTime<Utc>,
        ttl_minutes: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            identifier: identifier.into(),
            code: code.into(),
            kind,
            expires_at: now + Duration::minutes(ttl_minutes),
            verified: false,
            created_at: now,
        }
    }

    /// Uniformly random code in `100000..=999999` drawn from the OS CSPRNG
    pub fn generate_code() -> String {
        let value: u32 = OsRng.gen_range(CODE_MIN..=CODE_MAX);
        format!("{:06}", value)
    }

    /// A record expires strictly after `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Constant-time comparison against a submitted code
    pub fn matches(&self, submitted: &str) -> bool {
        constant_time_eq(self.code.as_bytes(), submitted.as_bytes())
    }

    /// Checks a submitted code in the order expiry, prior use, equality.
    ///
    /// A mismatch is reported without remaining attempts; the caller owns
    /// the throttle and fills that in.
    pub fn check(&self, submitted: &str, now: DateTime<Utc>) -> Result<(), OtpError> {
        if self.is_expired_at(now) {
            return Err(OtpError::Expired);
        }
        if self.verified {
            return Err(OtpError::AlreadyUsed);
        }
        if !self.matches(submitted) {
            return Err(OtpError::Mismatch {
                remaining_attempts: None,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_issue_sets_expiry_from_ttl() {
        let now = fixed_now();
        let record = OtpRecord::issue("user@example.com", OtpKind::Email, now, DEFAULT_TTL_MINUTES);

        assert_eq!(record.identifier, "user@example.com");
        assert_eq!(record.kind, OtpKind::Email);
        assert_eq!(record.created_at, now);
        assert_eq!(record.expires_at, now + Duration::minutes(10));
        assert!(!record.verified);
        assert_eq!(record.code.len(), CODE_LENGTH);
    }

    #[test]
    fn test_generate_code_format() {
        for _ in 0..500 {
            let code = OtpRecord::generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.chars().next(), Some('0'));
        }
    }

    #[test]
    fn test_generate_code_varies() {
        let codes: std::collections::HashSet<String> =
            (0..50).map(|_| OtpRecord::generate_code()).collect();
        assert!(codes.len() > 1);
    }

    #[test]
    fn test_expiry_is_strict() {
        let now = fixed_now();
        let record = OtpRecord::with_code("+14155552671", OtpKind::Phone, "123456", now, 10);

        assert!(!record.is_expired_at(record.expires_at));
        assert!(record.is_expired_at(record.expires_at + Duration::milliseconds(1)));
    }

    #[test]
    fn test_check_order() {
        let now = fixed_now();
        let mut record = OtpRecord::with_code("a@b.co", OtpKind::Email, "123456", now, 10);

        assert_eq!(record.check("123456", now), Ok(()));
        assert_eq!(
            record.check("654321", now),
            Err(OtpError::Mismatch { remaining_attempts: None })
        );

        record.verified = true;
        assert_eq!(record.check("123456", now), Err(OtpError::AlreadyUsed));

        // Expiry wins over prior use
        let later = now + Duration::minutes(11);
        assert_eq!(record.check("123456", later), Err(OtpError::Expired));
    }

    #[test]
    fn test_matches_rejects_prefix() {
        let record = OtpRecord::with_code("a@b.co", OtpKind::Email, "123456", fixed_now(), 10);
        assert!(record.matches("123456"));
        assert!(!record.matches("12345"));
        assert!(!record.matches("1234567"));
        assert!(!record.matches(""));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("email".parse::<OtpKind>(), Ok(OtpKind::Email));
        assert_eq!("phone".parse::<OtpKind>(), Ok(OtpKind::Phone));
        assert!("sms".parse::<OtpKind>().is_err());
        assert_eq!(serde_json::to_string(&OtpKind::Phone).unwrap(), "\"phone\"");
    }
}

//! Domain entities representing core business objects.

pub mod otp_record;
pub mod rate_limit_record;

pub use otp_record::{OtpKind, OtpRecord, CODE_LENGTH, DEFAULT_TTL_MINUTES};
pub use rate_limit_record::RateLimitRecord;

pub mod otp;
pub mod rate_limit;

pub use otp::{InMemoryOtpRepository, OtpRepository};
pub use rate_limit::{AttemptOutcome, InMemoryRateLimitRepository, RateLimitRepository};

//! Business services containing domain logic and use cases.

pub mod cleanup;
pub mod clock;
pub mod notification;
pub mod otp;
pub mod rate_limiter;

pub use cleanup::{CleanupConfig, CleanupResult, OtpCleanupService};
pub use clock::{Clock, ManualClock, SystemClock};
pub use notification::NotificationSender;
pub use otp::{OtpIssued, OtpService, OtpServiceConfig, OtpVerified};
pub use rate_limiter::{RateLimitDecision, RateLimiter};

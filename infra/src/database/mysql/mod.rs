mod otp_repository_impl;
mod rate_limit_repository_impl;

pub use otp_repository_impl::MySqlOtpRepository;
pub use rate_limit_repository_impl::MySqlRateLimitRepository;

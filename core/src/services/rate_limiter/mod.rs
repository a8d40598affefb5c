//! Fixed-window rate limiter shared by issuance and verification.

mod service;
mod types;


pub use service::RateLimiter;
pub use types::RateLimitDecision;

//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management and schema migrations
//! - `OtpRepository` and `RateLimitRepository` implementations

pub mod connection;
pub mod mysql;

pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlOtpRepository, MySqlRateLimitRepository};

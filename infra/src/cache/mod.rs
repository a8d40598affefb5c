//! Cache module for Redis-backed rate limiting
//!
//! Connection handling with retry, plus a `RateLimitRepository` whose
//! read-increment runs as a single Lua script.

pub mod rate_limit_store;
pub mod redis_client;

pub use rate_limit_store::RedisRateLimitRepository;
pub use redis_client::RedisClient;

//! Rate-limit window repository module.

mod r#trait;
pub use r#trait::{AttemptOutcome, RateLimitRepository};

mod memory;
pub use memory::InMemoryRateLimitRepository;

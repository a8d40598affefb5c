//! Courier integration support
//!
//! The courier API authenticates with a login token valid for ten days.
//! `TokenCache` keeps one token per process and refreshes it lazily.

pub mod shiprocket;
pub mod token_cache;

pub use shiprocket::ShiprocketAuthClient;
pub use token_cache::{TokenCache, TokenFetcher};

//! # HampyWorld Core
//!
//! Domain layer of the HampyWorld OTP backend: OTP and rate-limit entities,
//! storage traits with in-memory implementations, and the services that issue
//! and verify one-time passwords.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;

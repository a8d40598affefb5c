//! Domain layer containing the OTP and rate-limit entities.

pub mod entities;

pub use entities::*;

//! HTTP surface of the HampyWorld OTP service
//!
//! - `POST /otp/send` issues a code by email or SMS
//! - `POST /otp/verify` checks a submitted code
//! - `GET /health` reports liveness

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::create_app;
pub use routes::{AppState, ShippingTokens};

pub mod otp;
pub mod shipping;

pub use hw_shared::ErrorResponse;
pub use otp::{SendOtpRequest, SendOtpResponse, VerifyOtpRequest, VerifyOtpResponse};
pub use shipping::ShippingTokenResponse;

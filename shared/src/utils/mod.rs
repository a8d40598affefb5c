//! Common utility functions

pub mod mask;
pub mod validation;

// Re-export commonly used utilities
pub use mask::mask_identifier;
pub use validation::{is_valid_email, is_valid_phone, MAX_EMAIL_LENGTH};

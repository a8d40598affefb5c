use hw_shared::utils::validation::{is_valid_email, is_valid_phone};

use crate::domain::entities::OtpKind;
use crate::errors::OtpError;

/// Check an identifier against the format its kind requires
pub fn validate_identifier(identifier: &str, kind: OtpKind) -> Result<(), OtpError> {
    let valid = match kind {
        OtpKind::Email => is_valid_email(identifier),
        OtpKind::Phone => is_valid_phone(identifier),
    };
    if valid {
        Ok(())
    } else {
        Err(OtpError::InvalidFormat { kind })
    }
}

use hw_core::OtpKind;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// Email address or phone number, e.g. "user@example.com" or "+919876543210"
    #[validate(length(min = 1, message = "Identifier and type are required"))]
    pub identifier: String,

    #[serde(rename = "type")]
    pub kind: OtpKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(length(min = 1, message = "Identifier and type are required"))]
    pub identifier: String,

    /// Code as typed by the user; compared verbatim
    #[validate(length(min = 1, message = "OTP is required"))]
    pub otp: String,

    #[serde(rename = "type")]
    pub kind: OtpKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
    pub remaining_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_request_reads_type_field() {
        let request: SendOtpRequest =
            serde_json::from_str(r#"{"identifier":"user@example.com","type":"email"}"#).unwrap();
        assert_eq!(request.kind, OtpKind::Email);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let parsed = serde_json::from_str::<SendOtpRequest>(r#"{"identifier":"x","type":"fax"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_empty_otp_fails_validation() {
        let request = VerifyOtpRequest {
            identifier: "user@example.com".to_string(),
            otp: String::new(),
            kind: OtpKind::Email,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("otp"));
    }

    #[test]
    fn test_send_response_is_camel_case() {
        let response = SendOtpResponse {
            success: true,
            message: "OTP sent to phone".to_string(),
            remaining_attempts: 2,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["remainingAttempts"], 2);
        assert!(json.get("remaining_attempts").is_none());
    }
}

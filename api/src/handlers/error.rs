//! Mapping of domain failures onto HTTP responses

use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::header,
    HttpRequest, HttpResponse,
};
use hw_core::errors::{DomainError, OtpError};
use hw_shared::{error_codes, ErrorResponse};
use validator::ValidationErrors;

const INTERNAL_MESSAGE: &str = "Internal server error. Please try again";

/// Convert a service error into the response the client sees.
///
/// Provider reasons and store errors are logged here and never returned.
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Otp(otp_error) => handle_otp_error(otp_error),
        DomainError::Validation { message } => {
            tracing::debug!(%message, "Rejected request");
            HttpResponse::BadRequest().json(ErrorResponse::new(error_codes::INVALID_REQUEST, message))
        }
        DomainError::Internal { message } => {
            tracing::error!(error = %message, "Request failed");
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new(error_codes::INTERNAL_ERROR, INTERNAL_MESSAGE))
        }
    }
}

fn handle_otp_error(error: OtpError) -> HttpResponse {
    let code = error.code();
    match error {
        OtpError::RateLimited { retry_after_seconds } => HttpResponse::TooManyRequests()
            .insert_header((header::RETRY_AFTER, retry_after_seconds.to_string()))
            .json(
                ErrorResponse::new(code, error.to_string())
                    .add_detail("retryAfterSeconds", retry_after_seconds),
            ),
        OtpError::DeliveryFailed { kind, ref reason } => {
            tracing::error!(kind = %kind, %reason, "Notification provider failed");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                code,
                format!("Failed to send {}", kind.channel()),
            ))
        }
        OtpError::Mismatch {
            remaining_attempts: Some(remaining),
        } => HttpResponse::BadRequest().json(
            ErrorResponse::new(code, error.to_string()).add_detail("remainingAttempts", remaining),
        ),
        OtpError::InvalidFormat { .. }
        | OtpError::NotFound
        | OtpError::Expired
        | OtpError::AlreadyUsed
        | OtpError::Mismatch { .. } => {
            HttpResponse::BadRequest().json(ErrorResponse::new(code, error.to_string()))
        }
    }
}

/// 400 response for a body that deserialized but failed field validation
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let message = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid request".to_string());

    let fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();

    HttpResponse::BadRequest()
        .json(ErrorResponse::new(error_codes::INVALID_REQUEST, message).add_detail("fields", fields))
}

/// `JsonConfig` error handler: malformed JSON or missing fields become `400 invalid_request`
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Malformed request body");

    let message = match &err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body too large"
        }
        JsonPayloadError::ContentType => "Content-Type must be application/json",
        _ => "Identifier and type are required",
    };

    let response = HttpResponse::BadRequest()
        .json(ErrorResponse::new(error_codes::INVALID_REQUEST, message));
    InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, http::StatusCode};
    use hw_core::OtpKind;

    async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_rt::test]
    async fn test_invalid_phone_maps_to_bad_request() {
        let response = handle_domain_error(OtpError::InvalidFormat { kind: OtpKind::Phone }.into());
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "invalid_format");
        assert_eq!(json["message"], "Invalid phone format");
    }

    #[actix_rt::test]
    async fn test_rate_limited_sets_retry_after() {
        let response = handle_domain_error(OtpError::RateLimited { retry_after_seconds: 42 }.into());
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "42");

        let json = body_json(response).await;
        assert_eq!(json["error"], "rate_limited");
        assert_eq!(json["details"]["retryAfterSeconds"], 42);
    }

    #[actix_rt::test]
    async fn test_delivery_failure_hides_provider_reason() {
        let error = OtpError::DeliveryFailed {
            kind: OtpKind::Phone,
            reason: "401 unauthorized: key=abc".to_string(),
        };
        let response = handle_domain_error(error.into());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Failed to send SMS");
        assert!(!json.to_string().contains("abc"));
    }

    #[actix_rt::test]
    async fn test_mismatch_carries_remaining_attempts() {
        let response = handle_domain_error(
            OtpError::Mismatch {
                remaining_attempts: Some(3),
            }
            .into(),
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "otp_mismatch");
        assert_eq!(json["details"]["remainingAttempts"], 3);
    }

    #[actix_rt::test]
    async fn test_mismatch_without_throttle_has_no_details() {
        let response = handle_domain_error(
            OtpError::Mismatch {
                remaining_attempts: None,
            }
            .into(),
        );
        let json = body_json(response).await;
        assert!(json.get("details").is_none());
    }

    #[actix_rt::test]
    async fn test_internal_error_is_generic() {
        let response = handle_domain_error(DomainError::internal("Database error: pool timed out"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "internal_error");
        assert!(!json["message"].as_str().unwrap().contains("pool"));
    }
}

use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::{SendOtpRequest, SendOtpResponse};
use crate::handlers::{handle_domain_error, validation_error_response};
use crate::routes::AppState;

/// Handler for `POST /otp/send`
///
/// # Request Body
///
/// ```json
/// { "identifier": "user@example.com", "type": "email" }
/// ```
///
/// # Response
///
/// ```json
/// { "success": true, "message": "OTP sent to email", "remainingAttempts": 2 }
/// ```
///
/// Errors use the shared `ErrorResponse` body: `400 invalid_format`,
/// `429 rate_limited` with a `Retry-After` header, `500 delivery_failed`.
pub async fn send_otp(
    state: web::Data<AppState>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse {
    let request = request.into_inner();

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .otp_service
        .request_otp(&request.identifier, request.kind)
        .await
    {
        Ok(issued) => HttpResponse::Ok().json(SendOtpResponse {
            success: true,
            message: format!("OTP sent to {}", request.kind),
            remaining_attempts: issued.remaining_attempts,
        }),
        Err(e) => handle_domain_error(e),
    }
}

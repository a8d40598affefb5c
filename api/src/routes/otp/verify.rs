use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::{VerifyOtpRequest, VerifyOtpResponse};
use crate::handlers::{handle_domain_error, validation_error_response};
use crate::routes::AppState;

/// Handler for `POST /otp/verify`
///
/// Each failure has its own error code (`otp_not_found`, `otp_expired`,
/// `otp_already_used`, `otp_mismatch`) so the client can tell a typo from
/// a stale code.
pub async fn verify_otp(
    state: web::Data<AppState>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse {
    let request = request.into_inner();

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .otp_service
        .verify_otp(&request.identifier, &request.otp, request.kind)
        .await
    {
        Ok(_) => HttpResponse::Ok().json(VerifyOtpResponse {
            success: true,
            message: "OTP verified successfully".to_string(),
        }),
        Err(e) => handle_domain_error(e),
    }
}

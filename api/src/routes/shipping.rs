//! Courier auth-token endpoints
//!
//! Other internal services read the process-wide courier token from here
//! instead of logging in themselves. Both routes require
//! `Authorization: Bearer <SHIPPING_ACCESS_KEY>`.

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use constant_time_eq::constant_time_eq;
use std::sync::Arc;

use hw_infra::shipping::TokenCache;
use hw_infra::InfrastructureError;
use hw_shared::{error_codes, ErrorResponse};

use crate::dto::ShippingTokenResponse;
use crate::routes::AppState;

/// Process-wide courier token cache and the key that guards it
#[derive(Clone)]
pub struct ShippingTokens {
    pub cache: Arc<TokenCache>,
    pub access_key: String,
}

impl ShippingTokens {
    pub fn new(cache: Arc<TokenCache>, access_key: impl Into<String>) -> Self {
        Self {
            cache,
            access_key: access_key.into(),
        }
    }
}

/// `POST /shipping/token`
pub async fn shipping_token(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let shipping = match authorize(&req, &state) {
        Ok(shipping) => shipping,
        Err(response) => return response,
    };

    token_response(shipping, shipping.cache.get_token().await).await
}

/// `POST /shipping/token/refresh`
///
/// For callers whose courier request was answered with 401: drops the
/// cached token and logs in again.
pub async fn refresh_shipping_token(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let shipping = match authorize(&req, &state) {
        Ok(shipping) => shipping,
        Err(response) => return response,
    };

    shipping.cache.invalidate().await;
    tracing::info!(event = "shipping_token_invalidated", "Courier token dropped on request");

    token_response(shipping, shipping.cache.get_token().await).await
}

fn authorize<'a>(req: &HttpRequest, state: &'a AppState) -> Result<&'a ShippingTokens, HttpResponse> {
    let Some(shipping) = state.shipping.as_ref() else {
        return Err(HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
            error_codes::SHIPPING_UNAVAILABLE,
            "Shiprocket credentials not configured",
        )));
    };

    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();

    if presented.is_empty() || !constant_time_eq(presented.as_bytes(), shipping.access_key.as_bytes()) {
        tracing::warn!(event = "shipping_token_unauthorized", "Rejected courier token request");
        return Err(HttpResponse::Unauthorized().json(ErrorResponse::new(
            error_codes::UNAUTHORIZED,
            "Missing or invalid access key",
        )));
    }

    Ok(shipping)
}

async fn token_response(
    shipping: &ShippingTokens,
    result: Result<String, InfrastructureError>,
) -> HttpResponse {
    match result {
        Ok(token) => HttpResponse::Ok().json(ShippingTokenResponse {
            success: true,
            token,
            expires_at: shipping.cache.expires_at().await,
        }),
        Err(e) => {
            tracing::error!(error = %e, event = "shipping_auth_failed", "Courier login failed");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                error_codes::SHIPPING_AUTH_FAILED,
                "Failed to authenticate with Shiprocket",
            ))
        }
    }
}

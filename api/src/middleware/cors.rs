//! CORS configuration for browser clients of the storefront.
//!
//! An empty origin list accepts any origin, which is what development runs
//! with. Production always carries an explicit list (`ALLOWED_ORIGINS`).

use actix_cors::Cors;
use actix_web::http::{header, Method, Uri};
use hw_shared::CorsConfig;

/// Build the CORS middleware for `config`.
///
/// Entries that are not valid origins are skipped with a warning instead of
/// aborting the worker.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec![Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-client-info"),
            header::HeaderName::from_static("apikey"),
        ])
        .expose_headers(vec![header::RETRY_AFTER])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        tracing::debug!("CORS accepts any origin");
        return cors.allow_any_origin();
    }

    config
        .allowed_origins
        .iter()
        .filter(|origin| {
            let valid = origin.as_str() != "*" && origin.parse::<Uri>().is_ok();
            if !valid {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
            }
            valid
        })
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

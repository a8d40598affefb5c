//! Application factory
//!
//! Builds the Actix-web `App` with tracing, CORS, JSON limits and routes.
//! `main` calls it once per worker; tests call it with in-memory services.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse,
};
use hw_shared::{error_codes, CorsConfig, ErrorResponse};
use tracing_actix_web::TracingLogger;

use crate::handlers::json_error_handler;
use crate::middleware::create_cors;
use crate::routes::{self, AppState};

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
    cors: &CorsConfig,
    max_payload_size: usize,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let json_config = web::JsonConfig::default()
        .limit(max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        .wrap(create_cors(cors))
        // Registered last, so the request span also covers CORS rejections
        .wrap(TracingLogger::default())
        .configure(routes::configure)
        .default_service(web::route().to(not_found))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}

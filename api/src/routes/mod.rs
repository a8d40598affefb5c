//! Route table and shared handler state

pub mod health;
pub mod otp;
pub mod shipping;

use std::sync::Arc;

use actix_web::web;
use hw_core::services::OtpService;
use hw_infra::cache::RedisClient;
use hw_infra::database::DatabasePool;

pub use shipping::ShippingTokens;

/// Services shared by every worker
pub struct AppState {
    pub otp_service: Arc<OtpService>,
    /// Set when courier credentials are configured
    pub shipping: Option<ShippingTokens>,
    /// Checked by `/health` when MySQL backs a store
    pub database: Option<DatabasePool>,
    /// Checked by `/health` when Redis backs the rate limiter
    pub redis: Option<Arc<RedisClient>>,
}

impl AppState {
    pub fn new(otp_service: Arc<OtpService>) -> Self {
        Self {
            otp_service,
            shipping: None,
            database: None,
            redis: None,
        }
    }

    pub fn with_shipping(mut self, shipping: ShippingTokens) -> Self {
        self.shipping = Some(shipping);
        self
    }

    pub fn with_database(mut self, database: DatabasePool) -> Self {
        self.database = Some(database);
        self
    }

    pub fn with_redis(mut self, redis: Arc<RedisClient>) -> Self {
        self.redis = Some(redis);
        self
    }
}

/// Register all endpoints on an `App`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/otp")
                .route("/send", web::post().to(otp::send_otp))
                .route("/verify", web::post().to(otp::verify_otp)),
        )
        .service(
            web::scope("/shipping")
                .route("/token", web::post().to(shipping::shipping_token))
                .route("/token/refresh", web::post().to(shipping::refresh_shipping_token)),
        );
}

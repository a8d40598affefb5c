use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;

use hw_api::{create_app, telemetry, AppState, ShippingTokens};
use hw_core::repositories::{
    InMemoryOtpRepository, InMemoryRateLimitRepository, OtpRepository, RateLimitRepository,
};
use hw_core::services::{
    CleanupConfig, Clock, OtpCleanupService, OtpService, OtpServiceConfig, SystemClock,
};
use hw_infra::cache::{RedisClient, RedisRateLimitRepository};
use hw_infra::database::{DatabasePool, MySqlOtpRepository, MySqlRateLimitRepository};
use hw_infra::notification::create_notification_sender;
use hw_infra::shipping::{ShiprocketAuthClient, TokenCache};
use hw_shared::{AppConfig, DatabaseConfig, RateLimitStoreBackend, ShippingConfig, StoreBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init_tracing(&config.logging)?;
    config.validate().context("invalid configuration")?;

    tracing::info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting HampyWorld OTP service"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let uses_mysql = matches!(config.otp.store, StoreBackend::Mysql)
        || matches!(config.rate_limit.store, RateLimitStoreBackend::Mysql);
    let database = if uses_mysql {
        Some(connect_database(&config.database).await?)
    } else {
        None
    };

    let otp_repository: Arc<dyn OtpRepository> = match config.otp.store {
        StoreBackend::Mysql => Arc::new(MySqlOtpRepository::new(
            require_pool(&database)?.get_pool().clone(),
        )),
        StoreBackend::Memory => {
            tracing::warn!("OTP records are kept in memory and lost on restart");
            Arc::new(InMemoryOtpRepository::new())
        }
    };

    let mut redis = None;
    let rate_limit_repository: Arc<dyn RateLimitRepository> = match config.rate_limit.store {
        RateLimitStoreBackend::Mysql => {
            Arc::new(MySqlRateLimitRepository::new(
                require_pool(&database)?.get_pool().clone(),
            ))
        }
        RateLimitStoreBackend::Redis => {
            let client = Arc::new(
                RedisClient::new(config.cache.clone())
                    .await
                    .context("failed to connect to Redis")?,
            );
            redis = Some(client.clone());
            Arc::new(RedisRateLimitRepository::new(client))
        }
        RateLimitStoreBackend::Memory => {
            tracing::warn!("Rate limit windows are per process; limits do not hold across instances");
            Arc::new(InMemoryRateLimitRepository::new())
        }
    };

    let notifier = create_notification_sender(&config.notification)
        .context("failed to create notification sender")?;

    tracing::info!(
        otp_store = ?config.otp.store,
        rate_limit_store = ?config.rate_limit.store,
        notification_provider = notifier.provider_name(),
        failure_policy = ?config.rate_limit.failure_policy,
        "Backends selected"
    );

    let otp_service = Arc::new(OtpService::new(
        otp_repository.clone(),
        rate_limit_repository.clone(),
        notifier,
        clock.clone(),
        OtpServiceConfig::from_app(&config.otp, &config.rate_limit),
    ));

    let cleanup = Arc::new(OtpCleanupService::new(
        otp_repository,
        rate_limit_repository,
        clock.clone(),
        CleanupConfig::from(&config.otp),
    ));
    let _cleanup_task = cleanup.spawn();

    let mut app_state = AppState::new(otp_service);
    if let Some(shipping) = shipping_tokens(&config.shipping, clock)? {
        app_state = app_state.with_shipping(shipping);
    }
    if let Some(database) = &database {
        app_state = app_state.with_database(database.clone());
    }
    if let Some(redis) = redis {
        app_state = app_state.with_redis(redis);
    }
    let app_state = web::Data::new(app_state);
    let cors = config.cors.clone();
    let max_payload_size = config.server.max_payload_size;
    let bind_address = config.server.bind_address();

    tracing::info!(address = %bind_address, "HTTP server listening");

    let mut server = HttpServer::new(move || create_app(app_state.clone(), &cors, max_payload_size));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    if let Some(database) = database {
        database.close().await;
    }

    tracing::info!("HampyWorld OTP service stopped");
    Ok(())
}

async fn connect_database(config: &DatabaseConfig) -> anyhow::Result<DatabasePool> {
    let pool = DatabasePool::new(config.clone())
        .await
        .context("failed to connect to MySQL")?;

    if config.run_migrations {
        pool.run_migrations()
            .await
            .context("failed to run database migrations")?;
    }

    Ok(pool)
}

fn require_pool(database: &Option<DatabasePool>) -> anyhow::Result<&DatabasePool> {
    database
        .as_ref()
        .context("MySQL backend selected but no database pool was created")
}

/// Build the process-wide courier token cache and log in once in the
/// background so the first caller finds a cached token.
fn shipping_tokens(
    config: &ShippingConfig,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<Option<ShippingTokens>> {
    let access_key = match &config.access_key {
        Some(key) if config.has_credentials() => key.clone(),
        _ => {
            tracing::debug!("Shipping credentials not set, courier token endpoint disabled");
            return Ok(None);
        }
    };

    let fetcher = ShiprocketAuthClient::new(config.clone())
        .context("failed to create shipping client")?;
    let cache = Arc::new(TokenCache::new(
        Arc::new(fetcher),
        clock,
        chrono::Duration::hours(config.token_ttl_hours),
    ));

    let warm = cache.clone();
    tokio::spawn(async move {
        match warm.get_token().await {
            Ok(_) => {
                let expires_at = warm.expires_at().await;
                tracing::info!(?expires_at, "Shipping token cached");
            }
            Err(e) => tracing::warn!(error = %e, "Shipping token warm-up failed"),
        }
    });

    Ok(Some(ShippingTokens::new(cache, access_key)))
}

//! Process-wide, lazily refreshed auth token.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use hw_core::services::Clock;

use crate::InfrastructureError;

/// Source of fresh tokens
#[async_trait]
pub trait TokenFetcher: Send + Sync {
    async fn fetch_token(&self) -> Result<String, InfrastructureError>;
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Caches one token until `ttl` after it was fetched.
///
/// Callers arriving while a fetch is in flight wait for it instead of
/// starting their own. Failed fetches are not cached.
pub struct TokenCache {
    fetcher: Arc<dyn TokenFetcher>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    state: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new(fetcher: Arc<dyn TokenFetcher>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            fetcher,
            clock,
            ttl,
            state: Mutex::new(None),
        }
    }

    pub async fn get_token(&self) -> Result<String, InfrastructureError> {
        let mut state = self.state.lock().await;

        let now = self.clock.now();
        if let Some(cached) = state.as_ref().filter(|c| c.expires_at > now) {
            return Ok(cached.token.clone());
        }

        tracing::info!(event = "shipping_token_refresh", "Fetching courier auth token");
        let token = self.fetcher.fetch_token().await?;
        *state = Some(CachedToken {
            token: token.clone(),
            expires_at: now + self.ttl,
        });

        Ok(token)
    }

    /// Drop the cached token, e.g. after the courier answers 401
    pub async fn invalidate(&self) {
        *self.state.lock().await = None;
    }

    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.as_ref().map(|c| c.expires_at)
    }
}

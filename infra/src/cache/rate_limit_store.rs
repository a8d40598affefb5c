//! Redis implementation of the RateLimitRepository trait.
//!
//! Each key holds one hash `{id, identifier, window_start, count}` with
//! `window_start` in epoch milliseconds. Keys expire once their window
//! closes, so there is nothing for the cleanup service to delete.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use redis::Script;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use hw_core::domain::entities::RateLimitRecord;
use hw_core::errors::DomainError;
use hw_core::repositories::{AttemptOutcome, RateLimitRepository};

use super::redis_client::RedisClient;
use crate::InfrastructureError;

// KEYS[1] window key
// ARGV: now_ms, window_ms, max_attempts, new_id, identifier
// Returns {recorded, id, window_start_ms, count}
const RECORD_ATTEMPT_LUA: &str = r#"
local now = tonumber(ARGV[1])
local window = tonumber(ARGV[2])
local max = tonumber(ARGV[3])
local current = redis.call('HMGET', KEYS[1], 'id', 'window_start', 'count')
local start = tonumber(current[2])

if (not start) or start < now - window then
    redis.call('HSET', KEYS[1], 'id', ARGV[4], 'identifier', ARGV[5], 'window_start', ARGV[1], 'count', 1)
    redis.call('PEXPIRE', KEYS[1], window + 1)
    return {1, ARGV[4], ARGV[1], 1}
end

local count = tonumber(current[3])
if count >= max then
    return {0, current[1], current[2], count}
end

count = redis.call('HINCRBY', KEYS[1], 'count', 1)
return {1, current[1], current[2], count}
"#;

pub struct RedisRateLimitRepository {
    client: Arc<RedisClient>,
    script: Script,
}

impl RedisRateLimitRepository {
    pub fn new(client: Arc<RedisClient>) -> Self {
        Self {
            client,
            script: Script::new(RECORD_ATTEMPT_LUA),
        }
    }

    /// Identifiers are hashed so raw emails and phone numbers never appear in key names
    pub fn window_key(&self, identifier: &str) -> String {
        self.client.key(&format!("rate_limit:{}", hash_identifier(identifier)))
    }
}

pub(crate) fn hash_identifier(identifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identifier.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn millis_to_datetime(ms: i64) -> Result<DateTime<Utc>, InfrastructureError> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| InfrastructureError::Mapping(format!("Invalid window start: {}", ms)))
}

fn parse_uuid(raw: &str) -> Result<Uuid, InfrastructureError> {
    Uuid::parse_str(raw).map_err(|e| InfrastructureError::Mapping(format!("Invalid window UUID: {}", e)))
}

#[async_trait]
impl RateLimitRepository for RedisRateLimitRepository {
    async fn record_attempt(
        &self,
        identifier: &str,
        now: DateTime<Utc>,
        window: Duration,
        max_attempts: u32,
    ) -> Result<AttemptOutcome, DomainError> {
        let key = self.window_key(identifier);
        let args = vec![
            now.timestamp_millis().to_string(),
            window.num_milliseconds().to_string(),
            max_attempts.to_string(),
            Uuid::new_v4().to_string(),
            identifier.to_string(),
        ];

        let (recorded, id, window_start, count): (i64, String, i64, u32) =
            self.client.invoke_script(&self.script, &[&key], &args).await?;

        let record = RateLimitRecord {
            id: parse_uuid(&id)?,
            identifier: identifier.to_string(),
            window_start: millis_to_datetime(window_start)?,
            attempt_count: count,
        };

        Ok(if recorded == 1 {
            AttemptOutcome::Recorded(record)
        } else {
            AttemptOutcome::Rejected(record)
        })
    }

    async fn delete_windows_before(&self, _cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        // Windows expire on their own
        Ok(0)
    }
}

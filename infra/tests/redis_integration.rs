//! Integration tests for the Redis rate-limit store

use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use hw_core::repositories::{AttemptOutcome, RateLimitRepository};
use hw_infra::cache::{RedisClient, RedisRateLimitRepository};
use hw_shared::config::CacheConfig;

async fn repository() -> Arc<RedisRateLimitRepository> {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let client = RedisClient::new(CacheConfig::new(url)).await.unwrap();
    assert!(client.health_check().await.unwrap());
    Arc::new(RedisRateLimitRepository::new(Arc::new(client)))
}

#[tokio::test]
#[ignore] // Requires actual Redis
async fn test_window_counts_and_rejects() {
    let repo = repository().await;
    let key = format!("it-{}@example.com", Uuid::new_v4().simple());
    let now = Utc::now();
    let window = Duration::minutes(60);

    for expected in 1..=3 {
        let outcome = repo.record_attempt(&key, now, window, 3).await.unwrap();
        assert!(outcome.is_recorded());
        assert_eq!(outcome.record().attempt_count, expected);
    }
    let outcome = repo.record_attempt(&key, now, window, 3).await.unwrap();
    assert!(matches!(outcome, AttemptOutcome::Rejected(_)));
    assert_eq!(outcome.record().attempt_count, 3);
    assert_eq!(outcome.record().identifier, key);

    // Inactive window is replaced
    let later = now + Duration::minutes(61);
    let outcome = repo.record_attempt(&key, later, window, 3).await.unwrap();
    assert_eq!(outcome.record().attempt_count, 1);
}

#[tokio::test]
#[ignore] // Requires actual Redis
async fn test_concurrent_attempts_never_exceed_limit() {
    let repo = repository().await;
    let key = format!("it-{}@example.com", Uuid::new_v4().simple());
    let now = Utc::now();

    let mut handles = Vec::new();
    for _ in 0..25 {
        let repo = repo.clone();
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            repo.record_attempt(&key, now, Duration::minutes(60), 3)
                .await
                .unwrap()
                .is_recorded()
        }));
    }

    let mut recorded = 0;
    for handle in handles {
        if handle.await.unwrap() {
            recorded += 1;
        }
    }
    assert_eq!(recorded, 3);
}

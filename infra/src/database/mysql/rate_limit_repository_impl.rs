//! MySQL implementation of the RateLimitRepository trait.
//!
//! `record_attempt` runs in a transaction that locks the active window with
//! `SELECT ... FOR UPDATE`. Two callers racing to open the first window of a
//! key can deadlock on the gap lock; the loser is retried.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use uuid::Uuid;

use hw_core::domain::entities::RateLimitRecord;
use hw_core::errors::DomainError;
use hw_core::repositories::{AttemptOutcome, RateLimitRepository};
use hw_shared::utils::mask::mask_identifier;

use crate::InfrastructureError;

const MAX_TRANSACTION_ATTEMPTS: u32 = 3;

/// Fixed-window counters in the `otp_rate_limits` table
#[derive(Clone)]
pub struct MySqlRateLimitRepository {
    pool: MySqlPool,
}

impl MySqlRateLimitRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &MySqlRow) -> Result<RateLimitRecord, InfrastructureError> {
        let id: String = row.try_get("id")?;

        Ok(RateLimitRecord {
            id: Uuid::parse_str(&id)
                .map_err(|e| InfrastructureError::Mapping(format!("Invalid window UUID: {}", e)))?,
            identifier: row.try_get("identifier")?,
            window_start: row.try_get::<DateTime<Utc>, _>("window_start")?,
            attempt_count: row.try_get::<u32, _>("attempt_count")?,
        })
    }

    async fn record_attempt_once(
        &self,
        identifier: &str,
        now: DateTime<Utc>,
        window: Duration,
        max_attempts: u32,
    ) -> Result<AttemptOutcome, InfrastructureError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT id, identifier, attempt_count, window_start
            FROM otp_rate_limits
            WHERE identifier = ? AND window_start >= ?
            ORDER BY window_start DESC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(identifier)
        .bind(now - window)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match row {
            Some(row) => {
                let mut record = Self::row_to_record(&row)?;
                if record.attempt_count >= max_attempts {
                    AttemptOutcome::Rejected(record)
                } else {
                    sqlx::query(
                        "UPDATE otp_rate_limits SET attempt_count = attempt_count + 1 WHERE id = ?",
                    )
                    .bind(record.id.to_string())
                    .execute(&mut *tx)
                    .await?;
                    record.attempt_count += 1;
                    AttemptOutcome::Recorded(record)
                }
            }
            None => {
                let record = RateLimitRecord::open(identifier, now);
                sqlx::query(
                    r#"
                    INSERT INTO otp_rate_limits (id, identifier, attempt_count, window_start, created_at)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(record.id.to_string())
                .bind(&record.identifier)
                .bind(record.attempt_count)
                .bind(record.window_start)
                .bind(now)
                .execute(&mut *tx)
                .await?;
                AttemptOutcome::Recorded(record)
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }
}

#[async_trait]
impl RateLimitRepository for MySqlRateLimitRepository {
    async fn record_attempt(
        &self,
        identifier: &str,
        now: DateTime<Utc>,
        window: Duration,
        max_attempts: u32,
    ) -> Result<AttemptOutcome, DomainError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .record_attempt_once(identifier, now, window, max_attempts)
                .await
            {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_retryable() && attempt < MAX_TRANSACTION_ATTEMPTS => {
                    tracing::warn!(
                        identifier = %mask_identifier(identifier),
                        attempt,
                        error = %e,
                        "Rate limit transaction failed, retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn delete_windows_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM otp_rate_limits WHERE window_start < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(InfrastructureError::Database)?;

        Ok(result.rows_affected())
    }
}

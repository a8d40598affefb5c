//! MySQL implementation of the OtpRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use uuid::Uuid;

use hw_core::domain::entities::{OtpKind, OtpRecord};
use hw_core::errors::DomainError;
use hw_core::repositories::OtpRepository;
use hw_shared::utils::mask::mask_identifier;

use crate::InfrastructureError;

/// OTP records in the `otp_verifications` table
#[derive(Clone)]
pub struct MySqlOtpRepository {
    pool: MySqlPool,
}

impl MySqlOtpRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &MySqlRow) -> Result<OtpRecord, InfrastructureError> {
        let id: String = row.try_get("id")?;
        let kind: String = row.try_get("kind")?;

        Ok(OtpRecord {
            id: Uuid::parse_str(&id)
                .map_err(|e| InfrastructureError::Mapping(format!("Invalid OTP UUID: {}", e)))?,
            identifier: row.try_get("identifier")?,
            code: row.try_get("otp_code")?,
            kind: kind.parse::<OtpKind>().map_err(InfrastructureError::Mapping)?,
            expires_at: row.try_get::<DateTime<Utc>, _>("expires_at")?,
            verified: row.try_get("verified")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        })
    }
}

#[async_trait]
impl OtpRepository for MySqlOtpRepository {
    async fn insert(&self, record: &OtpRecord) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO otp_verifications (
                id, identifier, otp_code, kind, expires_at, verified, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(&record.identifier)
            .bind(&record.code)
            .bind(record.kind.as_str())
            .bind(record.expires_at)
            .bind(record.verified)
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    identifier = %mask_identifier(&record.identifier),
                    error = %e,
                    "Failed to insert OTP record"
                );
                InfrastructureError::Database(e)
            })?;

        Ok(())
    }

    async fn find_latest(
        &self,
        identifier: &str,
        kind: OtpKind,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let query = r#"
            SELECT id, identifier, otp_code, kind, expires_at, verified, created_at
            FROM otp_verifications
            WHERE identifier = ? AND kind = ?
            ORDER BY created_at DESC, seq DESC
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(identifier)
            .bind(kind.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(InfrastructureError::Database)?;

        match row {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn mark_verified(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE otp_verifications SET verified = TRUE WHERE id = ? AND verified = FALSE",
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(InfrastructureError::Database)?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM otp_verifications WHERE expires_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(InfrastructureError::Database)?;

        Ok(result.rows_affected())
    }
}

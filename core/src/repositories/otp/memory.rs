//! Process-local OTP store used in development and tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{OtpKind, OtpRecord};
use crate::errors::DomainError;

use super::r#trait::OtpRepository;

/// In-memory OTP repository
///
/// Records are kept in insertion order, so the latest match wins even when
/// two records share a `created_at`.
#[derive(Clone, Default)]
pub struct InMemoryOtpRepository {
    records: Arc<RwLock<Vec<OtpRecord>>>,
}

impl InMemoryOtpRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl OtpRepository for InMemoryOtpRepository {
    async fn insert(&self, record: &OtpRecord) -> Result<(), DomainError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn find_latest(
        &self,
        identifier: &str,
        kind: OtpKind,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .rev()
            .find(|r| r.identifier == identifier && r.kind == kind)
            .cloned())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) if !record.verified => {
                record.verified = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.expires_at >= cutoff);
        Ok((before - records.len()) as u64)
    }
}

pub mod locks;
pub mod object_cache;

use async_trait::async_trait;
use thiserror::Error;

use crate::protocols::issuance::holder::record::CredentialExchangeRecord;

#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Unable to lock record store: {0}")]
    Lock(String),
    #[error("Record (de)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Record store backend failure: {0}")]
    Backend(String),
}

/// Durable storage of exchange records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeRecordStore: Send + Sync {
    /// The record on `connection_id` whose thread is `thread_id`.
    async fn find(
        &self,
        thread_id: &str,
        connection_id: &str,
    ) -> Result<CredentialExchangeRecord, RecordStoreError>;

    async fn get(&self, exchange_id: &str) -> Result<CredentialExchangeRecord, RecordStoreError>;

    /// Inserts the record or replaces the one with the same exchange id.
    async fn save(&self, record: &CredentialExchangeRecord) -> Result<(), RecordStoreError>;

    async fn all(&self) -> Result<Vec<CredentialExchangeRecord>, RecordStoreError>;
}

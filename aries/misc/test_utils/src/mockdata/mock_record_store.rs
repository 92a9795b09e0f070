use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use aries_vcx_issuance::{
    protocols::issuance::holder::{record::CredentialExchangeRecord, state::HolderState},
    storage::{object_cache::InMemoryRecordStore, ExchangeRecordStore, RecordStoreError},
};
use async_trait::async_trait;

/// In-memory record store that counts writes and can refuse saves of `done` records.
pub struct MockRecordStore {
    inner: InMemoryRecordStore,
    saves: AtomicUsize,
    fail_done_saves: AtomicBool,
}

impl MockRecordStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryRecordStore::new("mock-record-store"),
            saves: AtomicUsize::new(0),
            fail_done_saves: AtomicBool::new(false),
        })
    }

    pub fn fail_done_saves(&self, fail: bool) {
        self.fail_done_saves.store(fail, Ordering::SeqCst);
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Inserts a record without counting it as a write.
    pub async fn seed(&self, record: &CredentialExchangeRecord) -> Result<(), RecordStoreError> {
        self.inner.save(record).await
    }
}

#[async_trait]
impl ExchangeRecordStore for MockRecordStore {
    async fn find(
        &self,
        thread_id: &str,
        connection_id: &str,
    ) -> Result<CredentialExchangeRecord, RecordStoreError> {
        self.inner.find(thread_id, connection_id).await
    }

    async fn get(&self, exchange_id: &str) -> Result<CredentialExchangeRecord, RecordStoreError> {
        self.inner.get(exchange_id).await
    }

    async fn save(&self, record: &CredentialExchangeRecord) -> Result<(), RecordStoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if record.get_state() == HolderState::Done && self.fail_done_saves.load(Ordering::SeqCst) {
            return Err(RecordStoreError::Backend("storage unavailable".to_owned()));
        }
        self.inner.save(record).await
    }

    async fn all(&self) -> Result<Vec<CredentialExchangeRecord>, RecordStoreError> {
        self.inner.all().await
    }
}

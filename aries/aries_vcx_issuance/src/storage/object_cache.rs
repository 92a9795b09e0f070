use std::{
    collections::HashMap,
    sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;

use super::{ExchangeRecordStore, RecordStoreError};
use crate::protocols::issuance::holder::record::CredentialExchangeRecord;

/// Record store keeping serialized records in process memory, keyed by exchange id.
pub struct InMemoryRecordStore {
    cache_name: String,
    store: RwLock<HashMap<String, Mutex<String>>>,
}

impl InMemoryRecordStore {
    pub fn new(cache_name: &str) -> Self {
        Self {
            store: Default::default(),
            cache_name: cache_name.to_string(),
        }
    }

    fn lock_store_read(
        &self,
    ) -> Result<RwLockReadGuard<'_, HashMap<String, Mutex<String>>>, RecordStoreError> {
        self.store.read().map_err(|e| {
            error!("Unable to read-lock record store: {:?}", e);
            RecordStoreError::Lock(format!(
                "[InMemoryRecordStore: {}] Unable to lock record store: {:?}",
                self.cache_name, e
            ))
        })
    }

    fn lock_store_write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<String, Mutex<String>>>, RecordStoreError> {
        self.store.write().map_err(|e| {
            error!("Unable to write-lock record store: {:?}", e);
            RecordStoreError::Lock(format!(
                "[InMemoryRecordStore: {}] Unable to lock record store: {:?}",
                self.cache_name, e
            ))
        })
    }

    fn read_entry(
        &self,
        entry: &Mutex<String>,
    ) -> Result<CredentialExchangeRecord, RecordStoreError> {
        let serialized = entry.lock().map_err(|_| {
            RecordStoreError::Lock(format!(
                "[InMemoryRecordStore: {}] Unable to lock record",
                self.cache_name
            ))
        })?;
        Ok(serde_json::from_str(&serialized)?)
    }

    fn records(&self) -> Result<Vec<CredentialExchangeRecord>, RecordStoreError> {
        let store = self.lock_store_read()?;
        store.values().map(|entry| self.read_entry(entry)).collect()
    }
}

#[async_trait]
impl ExchangeRecordStore for InMemoryRecordStore {
    async fn find(
        &self,
        thread_id: &str,
        connection_id: &str,
    ) -> Result<CredentialExchangeRecord, RecordStoreError> {
        self.records()?
            .into_iter()
            .find(|record| record.thread_id == thread_id && record.connection_id == connection_id)
            .ok_or_else(|| {
                RecordStoreError::NotFound(format!(
                    "[InMemoryRecordStore: {}] No record for thread {} on connection {}",
                    self.cache_name, thread_id, connection_id
                ))
            })
    }

    async fn get(&self, exchange_id: &str) -> Result<CredentialExchangeRecord, RecordStoreError> {
        let store = self.lock_store_read()?;
        match store.get(exchange_id) {
            Some(entry) => self.read_entry(entry),
            None => Err(RecordStoreError::NotFound(format!(
                "[InMemoryRecordStore: {}] Record not found for id: {}",
                self.cache_name, exchange_id
            ))),
        }
    }

    async fn save(&self, record: &CredentialExchangeRecord) -> Result<(), RecordStoreError> {
        let serialized = serde_json::to_string(record)?;
        let mut store = self.lock_store_write()?;
        store.insert(record.exchange_id.clone(), Mutex::new(serialized));
        Ok(())
    }

    async fn all(&self) -> Result<Vec<CredentialExchangeRecord>, RecordStoreError> {
        self.records()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::issuance::holder::state::HolderState;

    #[tokio::test]
    async fn test_save_replaces_and_get_reads_back() {
        let store = InMemoryRecordStore::new("test");
        let mut record =
            CredentialExchangeRecord::new_holder("conn-1", "thread-1", HolderState::RequestSent);
        store.save(&record).await.unwrap();

        record.abandon("gone").unwrap();
        store.save(&record).await.unwrap();

        let loaded = store.get(&record.exchange_id).await.unwrap();
        assert_eq!(loaded, record);
        assert_eq!(store.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_requires_thread_and_connection() {
        let store = InMemoryRecordStore::new("test");
        let record =
            CredentialExchangeRecord::new_holder("conn-1", "thread-1", HolderState::RequestSent);
        store.save(&record).await.unwrap();

        assert_eq!(store.find("thread-1", "conn-1").await.unwrap(), record);
        assert!(matches!(
            store.find("thread-1", "conn-2").await,
            Err(RecordStoreError::NotFound(_))
        ));
        assert!(matches!(
            store.find("thread-2", "conn-1").await,
            Err(RecordStoreError::NotFound(_))
        ));
        assert!(matches!(store.get("unknown").await, Err(RecordStoreError::NotFound(_))));
    }
}

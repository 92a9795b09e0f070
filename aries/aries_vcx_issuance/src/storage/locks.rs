use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::errors::error::prelude::*;

/// One async mutex per exchange, so a record's read-modify-write never interleaves
/// with another message for the same thread.
#[derive(Debug, Default)]
pub struct ExchangeLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl ExchangeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(connection_id: &str, thread_id: &str) -> String {
        format!("{connection_id}/{thread_id}")
    }

    pub async fn acquire(
        &self,
        connection_id: &str,
        thread_id: &str,
    ) -> VcxIssuanceResult<OwnedMutexGuard<()>> {
        let lock = {
            let mut locks = self.locks.lock().map_err(|err| {
                AriesVcxIssuanceError::from_msg(
                    AriesVcxIssuanceErrorKind::LockError,
                    format!("Unable to lock exchange lock table: {err}"),
                )
            })?;
            // Entries nobody else holds are dropped on the way.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(Self::key(connection_id, thread_id))
                .or_default()
                .clone()
        };
        Ok(lock.lock_owned().await)
    }

    pub fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_same_exchange_is_serialized() {
        let locks = Arc::new(ExchangeLocks::new());
        let guard = locks.acquire("conn-1", "thread-1").await.unwrap();

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move { locks.acquire("conn-1", "thread-1").await.map(|_| ()) })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_other_exchanges_do_not_wait() {
        let locks = ExchangeLocks::new();
        let _guard = locks.acquire("conn-1", "thread-1").await.unwrap();

        let other = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire("conn-1", "thread-2"),
        )
        .await;
        assert!(other.is_ok());
        assert_eq!(locks.len(), 2);
    }
}

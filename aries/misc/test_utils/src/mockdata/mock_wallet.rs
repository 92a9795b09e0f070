use std::{collections::VecDeque, sync::Mutex};

use aries_vcx_issuance::credentials::{
    verified_credential::VerifiedCredential,
    wallet::{HolderWallet, HolderWalletError, InMemoryHolderWallet},
};
use async_trait::async_trait;

/// In-memory wallet that fails the next scripted `store_credential` calls.
#[derive(Debug, Default)]
pub struct ScriptedHolderWallet {
    inner: InMemoryHolderWallet,
    store_failures: Mutex<VecDeque<HolderWalletError>>,
    deleted: Mutex<Vec<String>>,
}

impl ScriptedHolderWallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_store(self, err: HolderWalletError) -> Self {
        if let Ok(mut failures) = self.store_failures.lock() {
            failures.push_back(err);
        }
        self
    }

    pub fn stored_count(&self) -> usize {
        self.inner.count()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().map(|d| d.clone()).unwrap_or_default()
    }

    pub fn get_credential(
        &self,
        credential_id: &str,
    ) -> Result<VerifiedCredential, HolderWalletError> {
        self.inner.get_credential(credential_id)
    }
}

#[async_trait]
impl HolderWallet for ScriptedHolderWallet {
    async fn store_credential(
        &self,
        credential_id: &str,
        credential: &VerifiedCredential,
    ) -> Result<String, HolderWalletError> {
        let scripted = self
            .store_failures
            .lock()
            .map_err(|err| HolderWalletError::Backend(err.to_string()))?
            .pop_front();
        match scripted {
            Some(err) => Err(err),
            None => self.inner.store_credential(credential_id, credential).await,
        }
    }

    async fn delete_credential(&self, credential_id: &str) -> Result<(), HolderWalletError> {
        if let Ok(mut deleted) = self.deleted.lock() {
            deleted.push(credential_id.to_owned());
        }
        self.inner.delete_credential(credential_id).await
    }
}

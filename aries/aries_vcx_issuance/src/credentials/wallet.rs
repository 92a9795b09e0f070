use std::{collections::HashMap, sync::RwLock};

use async_trait::async_trait;
use thiserror::Error;

use super::verified_credential::VerifiedCredential;

#[derive(Debug, Error)]
pub enum HolderWalletError {
    #[error("Credential already stored: {0}")]
    DuplicateRecord(String),
    #[error("Credential rejected by wallet: {0}")]
    InvalidCredential(String),
    #[error("Wallet capacity exceeded: {0}")]
    Capacity(String),
    #[error("Wallet backend failure: {0}")]
    Backend(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HolderWallet: Send + Sync {
    /// Stores the credential under `credential_id` and returns the id it was stored under.
    async fn store_credential(
        &self,
        credential_id: &str,
        credential: &VerifiedCredential,
    ) -> Result<String, HolderWalletError>;

    async fn delete_credential(&self, credential_id: &str) -> Result<(), HolderWalletError>;
}

/// Wallet keeping credentials in process memory.
#[derive(Debug, Default)]
pub struct InMemoryHolderWallet {
    credentials: RwLock<HashMap<String, VerifiedCredential>>,
}

impl InMemoryHolderWallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_credential(
        &self,
        credential_id: &str,
    ) -> Result<VerifiedCredential, HolderWalletError> {
        let credentials = self
            .credentials
            .read()
            .map_err(|err| {
                HolderWalletError::Backend(format!("Unable to read-lock wallet: {err}"))
            })?;
        credentials.get(credential_id).cloned().ok_or_else(|| {
            HolderWalletError::Backend(format!("Credential not found: {credential_id}"))
        })
    }

    pub fn count(&self) -> usize {
        self.credentials.read().map(|c| c.len()).unwrap_or_default()
    }
}

#[async_trait]
impl HolderWallet for InMemoryHolderWallet {
    async fn store_credential(
        &self,
        credential_id: &str,
        credential: &VerifiedCredential,
    ) -> Result<String, HolderWalletError> {
        let mut credentials = self.credentials.write().map_err(|err| {
            HolderWalletError::Backend(format!("Unable to write-lock wallet: {err}"))
        })?;
        if credentials.contains_key(credential_id) {
            return Err(HolderWalletError::DuplicateRecord(credential_id.to_owned()));
        }
        if let Some((existing_id, _)) = credentials.iter().find(|(_, c)| c.raw == credential.raw) {
            return Err(HolderWalletError::DuplicateRecord(format!(
                "same credential already stored as {existing_id}"
            )));
        }
        credentials.insert(credential_id.to_owned(), credential.clone());
        Ok(credential_id.to_owned())
    }

    async fn delete_credential(&self, credential_id: &str) -> Result<(), HolderWalletError> {
        let mut credentials = self.credentials.write().map_err(|err| {
            HolderWalletError::Backend(format!("Unable to write-lock wallet: {err}"))
        })?;
        credentials
            .remove(credential_id)
            .map(|_| ())
            .ok_or_else(|| {
                HolderWalletError::Backend(format!("Credential not found: {credential_id}"))
            })
    }
}

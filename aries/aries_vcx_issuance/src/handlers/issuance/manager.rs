use std::sync::Arc;

use async_trait::async_trait;
use messages::msg_fields::protocols::cred_issuance::v1::{
    ack::AckCredentialV1, issue_credential::IssueCredentialV1,
    problem_report::CredIssuanceProblemReportV1,
};
use uuid::Uuid;

use crate::{
    credentials::{verifier::CredentialVerifier, wallet::HolderWallet},
    errors::error::prelude::*,
    protocols::{
        common::{build_credential_ack, build_problem_report_msg, ISSUANCE_ABANDONED_CODE},
        issuance::holder::{record::CredentialExchangeRecord, state::HolderState},
    },
    storage::{locks::ExchangeLocks, ExchangeRecordStore, RecordStoreError},
};

/// Holder side of the issue-credential exchange.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialManager: Send + Sync {
    /// Verifies an inbound credential against the exchange waiting for it and moves the
    /// exchange to `credential-received`, or to `abandoned` when verification fails.
    async fn receive_credential(
        &self,
        message: IssueCredentialV1,
        connection_id: &str,
    ) -> VcxIssuanceResult<CredentialExchangeRecord>;

    /// Puts the received credential into the wallet and moves the exchange to `done`, or to
    /// `abandoned` when the wallet or the record store refuses.
    async fn store_credential(
        &self,
        record: CredentialExchangeRecord,
    ) -> VcxIssuanceResult<CredentialExchangeRecord>;

    fn create_credential_ack(
        &self,
        record: &CredentialExchangeRecord,
    ) -> VcxIssuanceResult<AckCredentialV1>;

    async fn get_exchange_record(
        &self,
        exchange_id: &str,
    ) -> VcxIssuanceResult<CredentialExchangeRecord>;

    /// Moves the exchange to `abandoned` with `reason` as error detail and persists it.
    /// An exchange that is already abandoned is returned as stored.
    async fn abandon_exchange(
        &self,
        record: CredentialExchangeRecord,
        reason: &str,
    ) -> VcxIssuanceResult<CredentialExchangeRecord>;
}

pub fn problem_report_for_record(record: &CredentialExchangeRecord) -> CredIssuanceProblemReportV1 {
    let report = build_problem_report_msg(
        ISSUANCE_ABANDONED_CODE,
        record.error_msg.clone(),
        &record.thread_id,
    );
    CredIssuanceProblemReportV1::builder()
        .id(report.id)
        .content(report.content.into())
        .decorators(report.decorators)
        .build()
}

pub struct HolderCredentialManager {
    store: Arc<dyn ExchangeRecordStore>,
    verifier: Arc<dyn CredentialVerifier>,
    wallet: Arc<dyn HolderWallet>,
    locks: ExchangeLocks,
}

impl HolderCredentialManager {
    pub fn new(
        store: Arc<dyn ExchangeRecordStore>,
        verifier: Arc<dyn CredentialVerifier>,
        wallet: Arc<dyn HolderWallet>,
    ) -> Self {
        Self {
            store,
            verifier,
            wallet,
            locks: ExchangeLocks::new(),
        }
    }

    async fn find_record(
        &self,
        message: &IssueCredentialV1,
        connection_id: &str,
    ) -> VcxIssuanceResult<CredentialExchangeRecord> {
        let thread = &message.decorators.thread;
        let record = match (
            self.store.find(&thread.thid, connection_id).await,
            thread.pthid.as_deref(),
        ) {
            (Err(RecordStoreError::NotFound(_)), Some(pthid)) => {
                self.find_by_parent_thread(pthid, connection_id).await?
            }
            (found, _) => found?,
        };

        let belongs = matches_thread_id!(message, record.thread_id.as_str())
            || record
                .parent_thread_id
                .as_deref()
                .is_some_and(|parent| matches_thread_id!(message, parent));
        if !belongs {
            return Err(AriesVcxIssuanceError::from_msg(
                AriesVcxIssuanceErrorKind::RecordNotFound,
                format!(
                    "Record {} does not belong to thread {}",
                    record.exchange_id, thread.thid
                ),
            ));
        }
        Ok(record)
    }

    /// The exchange whose own thread, or whose parent thread, is `pthid`.
    async fn find_by_parent_thread(
        &self,
        pthid: &str,
        connection_id: &str,
    ) -> VcxIssuanceResult<CredentialExchangeRecord> {
        match self.store.find(pthid, connection_id).await {
            Err(RecordStoreError::NotFound(msg)) => self
                .store
                .all()
                .await?
                .into_iter()
                .find(|record| {
                    record.connection_id == connection_id
                        && record.parent_thread_id.as_deref() == Some(pthid)
                })
                .ok_or_else(|| {
                    AriesVcxIssuanceError::from_msg(AriesVcxIssuanceErrorKind::RecordNotFound, msg)
                }),
            found => Ok(found?),
        }
    }

    async fn persist_abandoned(
        &self,
        mut record: CredentialExchangeRecord,
        reason: &str,
    ) -> VcxIssuanceResult<CredentialExchangeRecord> {
        record.abandon(reason)?;
        self.store.save(&record).await?;
        Ok(record)
    }

    /// Abandons the exchange after `err`. Failures are only logged; the caller still
    /// returns `err`.
    async fn abandon_after(&self, record: CredentialExchangeRecord, err: &AriesVcxIssuanceError) {
        let exchange_id = record.exchange_id.clone();
        if let Err(abandon_err) = self.persist_abandoned(record, err.msg()).await {
            error!(
                "Failed to persist abandoned exchange {}: {}",
                exchange_id, abandon_err
            );
        }
    }
}

#[async_trait]
impl CredentialManager for HolderCredentialManager {
    async fn receive_credential(
        &self,
        message: IssueCredentialV1,
        connection_id: &str,
    ) -> VcxIssuanceResult<CredentialExchangeRecord> {
        trace!(
            "HolderCredentialManager::receive_credential >>> message id: {}, connection_id: {}",
            message.id,
            connection_id
        );
        let found = self.find_record(&message, connection_id).await?;
        let _guard = self.locks.acquire(connection_id, &found.thread_id).await?;

        let mut record = self.store.get(&found.exchange_id).await?;
        if record.get_state() != HolderState::RequestSent {
            warn!(
                "Rejecting credential {} for exchange {} in state {}",
                message.id,
                record.exchange_id,
                record.get_state()
            );
            return Err(AriesVcxIssuanceError::from_msg(
                AriesVcxIssuanceErrorKind::RecordNotFound,
                format!(
                    "Exchange {} is in state {}, expected {}",
                    record.exchange_id,
                    record.get_state(),
                    HolderState::RequestSent
                ),
            ));
        }

        match self.verifier.verify(&message).await {
            Ok(credential) => {
                record.accept_credential(message, credential)?;
                self.store.save(&record).await?;
                Ok(record)
            }
            Err(verifier_err) => {
                let err = AriesVcxIssuanceError::from(verifier_err);
                warn!(
                    "Credential {} for exchange {} failed verification: {}",
                    message.id,
                    record.exchange_id,
                    err.msg()
                );
                record.abandon(err.msg())?;
                self.store.save(&record).await?;
                Err(err)
            }
        }
    }

    async fn store_credential(
        &self,
        record: CredentialExchangeRecord,
    ) -> VcxIssuanceResult<CredentialExchangeRecord> {
        trace!(
            "HolderCredentialManager::store_credential >>> exchange_id: {}",
            record.exchange_id
        );
        let _guard = self
            .locks
            .acquire(&record.connection_id, &record.thread_id)
            .await?;

        let current = match self.store.get(&record.exchange_id).await {
            Ok(current) => current,
            Err(read_err) => {
                let err = AriesVcxIssuanceError::from(read_err);
                if err.is_recoverable_storage_failure() {
                    warn!(
                        "Cannot re-read exchange {} before storing its credential: {}",
                        record.exchange_id, err
                    );
                    self.abandon_after(record, &err).await;
                }
                return Err(err);
            }
        };
        if current.get_state() != HolderState::CredentialReceived {
            return Err(AriesVcxIssuanceError::from_msg(
                AriesVcxIssuanceErrorKind::InvalidState,
                format!(
                    "Cannot store credential for exchange {} in state {}",
                    current.exchange_id,
                    current.get_state()
                ),
            ));
        }
        let credential = current.credential.clone().ok_or_else(|| {
            AriesVcxIssuanceError::from_msg(
                AriesVcxIssuanceErrorKind::InvalidState,
                format!("Exchange {} holds no verified credential", current.exchange_id),
            )
        })?;

        let credential_id = Uuid::new_v4().to_string();
        let stored_id = match self.wallet.store_credential(&credential_id, &credential).await {
            Ok(stored_id) => stored_id,
            Err(wallet_err) => {
                let err = AriesVcxIssuanceError::from(wallet_err);
                self.abandon_after(current, &err).await;
                return Err(err);
            }
        };

        let mut done = current.clone();
        done.mark_stored(&stored_id)?;
        if let Err(save_err) = self.store.save(&done).await {
            let err = AriesVcxIssuanceError::from_msg(
                AriesVcxIssuanceErrorKind::StorageError,
                format!(
                    "Credential {} stored but exchange {} could not be saved: {}",
                    stored_id, done.exchange_id, save_err
                ),
            );
            if let Err(delete_err) = self.wallet.delete_credential(&stored_id).await {
                error!(
                    "Failed to remove credential {} after record save failure: {}",
                    stored_id, delete_err
                );
            }
            self.abandon_after(current, &err).await;
            return Err(err);
        }

        Ok(done)
    }

    fn create_credential_ack(
        &self,
        record: &CredentialExchangeRecord,
    ) -> VcxIssuanceResult<AckCredentialV1> {
        trace!(
            "HolderCredentialManager::create_credential_ack >>> exchange_id: {}",
            record.exchange_id
        );
        if record.get_state() != HolderState::Done {
            return Err(AriesVcxIssuanceError::from_msg(
                AriesVcxIssuanceErrorKind::InvalidState,
                format!(
                    "Cannot acknowledge exchange {} in state {}",
                    record.exchange_id,
                    record.get_state()
                ),
            ));
        }
        Ok(build_credential_ack(&record.thread_id))
    }

    async fn get_exchange_record(
        &self,
        exchange_id: &str,
    ) -> VcxIssuanceResult<CredentialExchangeRecord> {
        Ok(self.store.get(exchange_id).await?)
    }

    async fn abandon_exchange(
        &self,
        record: CredentialExchangeRecord,
        reason: &str,
    ) -> VcxIssuanceResult<CredentialExchangeRecord> {
        trace!(
            "HolderCredentialManager::abandon_exchange >>> exchange_id: {}, reason: {}",
            record.exchange_id,
            reason
        );
        let _guard = self
            .locks
            .acquire(&record.connection_id, &record.thread_id)
            .await?;

        let current = match self.store.get(&record.exchange_id).await {
            Ok(current) => current,
            Err(RecordStoreError::NotFound(msg)) => {
                return Err(AriesVcxIssuanceError::from_msg(
                    AriesVcxIssuanceErrorKind::RecordNotFound,
                    msg,
                ))
            }
            Err(read_err) => {
                warn!(
                    "Cannot re-read exchange {}, abandoning the held copy: {}",
                    record.exchange_id, read_err
                );
                record
            }
        };
        if current.get_state() == HolderState::Abandoned {
            return Ok(current);
        }
        self.persist_abandoned(current, reason).await
    }
}

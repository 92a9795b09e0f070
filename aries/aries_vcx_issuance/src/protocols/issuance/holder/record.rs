use std::collections::HashMap;

use chrono::{DateTime, Utc};
use messages::msg_fields::protocols::cred_issuance::v1::issue_credential::IssueCredentialV1;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::{ExchangeRole, HolderState};
use crate::{credentials::verified_credential::VerifiedCredential, errors::error::prelude::*};

/// Progress of one credential exchange, as seen by this agent.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CredentialExchangeRecord {
    pub exchange_id: String,
    pub connection_id: String,
    pub thread_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_thread_id: Option<String>,
    pub role: ExchangeRole,
    pub state: HolderState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_credential: Option<IssueCredentialV1>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<VerifiedCredential>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CredentialExchangeRecord {
    pub fn new(
        connection_id: &str,
        thread_id: &str,
        role: ExchangeRole,
        state: HolderState,
    ) -> Self {
        let now = Utc::now();
        Self {
            exchange_id: Uuid::new_v4().to_string(),
            connection_id: connection_id.to_owned(),
            thread_id: thread_id.to_owned(),
            parent_thread_id: None,
            role,
            state,
            raw_credential: None,
            credential: None,
            credential_id: None,
            error_msg: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn new_holder(connection_id: &str, thread_id: &str, state: HolderState) -> Self {
        Self::new(connection_id, thread_id, ExchangeRole::Holder, state)
    }

    pub fn with_parent_thread_id(mut self, parent_thread_id: &str) -> Self {
        self.parent_thread_id = Some(parent_thread_id.to_owned());
        self
    }

    pub fn get_state(&self) -> HolderState {
        self.state
    }

    fn transition(&mut self, state: HolderState) {
        info!(
            "Exchange {} (thread {}): {} -> {}",
            self.exchange_id, self.thread_id, self.state, state
        );
        self.state = state;
        self.updated_at = Utc::now();
    }

    fn expect_state(&self, expected: HolderState, action: &str) -> VcxIssuanceResult<()> {
        if self.state != expected {
            return Err(AriesVcxIssuanceError::from_msg(
                AriesVcxIssuanceErrorKind::InvalidState,
                format!(
                    "Cannot {} for exchange {} in state {}, expected {}",
                    action, self.exchange_id, self.state, expected
                ),
            ));
        }
        Ok(())
    }

    /// request-sent -> credential-received
    pub fn accept_credential(
        &mut self,
        message: IssueCredentialV1,
        credential: VerifiedCredential,
    ) -> VcxIssuanceResult<()> {
        self.expect_state(HolderState::RequestSent, "accept credential")?;
        self.raw_credential = Some(message);
        self.credential = Some(credential);
        self.transition(HolderState::CredentialReceived);
        Ok(())
    }

    /// credential-received -> done
    pub fn mark_stored(&mut self, credential_id: &str) -> VcxIssuanceResult<()> {
        self.expect_state(HolderState::CredentialReceived, "mark credential stored")?;
        self.credential_id = Some(credential_id.to_owned());
        self.transition(HolderState::Done);
        Ok(())
    }

    /// Any non-terminal state -> abandoned. A stored credential reference does not survive.
    pub fn abandon(&mut self, reason: &str) -> VcxIssuanceResult<()> {
        if self.state.is_terminal() {
            return Err(AriesVcxIssuanceError::from_msg(
                AriesVcxIssuanceErrorKind::InvalidState,
                format!(
                    "Cannot abandon exchange {}, already terminal in state {}",
                    self.exchange_id, self.state
                ),
            ));
        }
        self.credential_id = None;
        self.error_msg = Some(reason.to_owned());
        self.transition(HolderState::Abandoned);
        Ok(())
    }

    pub fn check_invariants(&self) -> VcxIssuanceResult<()> {
        if self.credential_id.is_some() != (self.state == HolderState::Done) {
            return Err(AriesVcxIssuanceError::from_msg(
                AriesVcxIssuanceErrorKind::InvalidState,
                format!(
                    "Exchange {} in state {} has credential id {:?}",
                    self.exchange_id, self.state, self.credential_id
                ),
            ));
        }
        if self.state == HolderState::Abandoned && self.error_msg.is_none() {
            return Err(AriesVcxIssuanceError::from_msg(
                AriesVcxIssuanceErrorKind::InvalidState,
                format!("Exchange {} abandoned without error detail", self.exchange_id),
            ));
        }
        Ok(())
    }

    pub fn credential_attributes(&self) -> HashMap<String, String> {
        self.credential
            .as_ref()
            .map(VerifiedCredential::attributes)
            .unwrap_or_default()
    }

    pub fn rev_reg_id(&self) -> Option<&str> {
        self.credential.as_ref()?.rev_reg_id.as_deref()
    }

    pub fn is_revokable(&self) -> bool {
        self.rev_reg_id().is_some()
    }
}

use async_trait::async_trait;
use messages::msg_fields::protocols::cred_issuance::v1::issue_credential::IssueCredentialV1;
use serde_json::Value;
use thiserror::Error;

use super::verified_credential::VerifiedCredential;

#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("Credential attachment unreadable: {0}")]
    UnreadableAttachment(String),
    #[error("Credential structure invalid: {0}")]
    InvalidStructure(String),
    #[error("Credential signature invalid: {0}")]
    InvalidSignature(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(
        &self,
        message: &IssueCredentialV1,
    ) -> Result<VerifiedCredential, VerifierError>;
}

/// Checks that the first `credentials~attach` entry is a well formed credential.
///
/// Signatures are not checked here; a cryptographic verifier takes its place behind
/// [`CredentialVerifier`] when one is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct AttachmentCredentialVerifier;

impl AttachmentCredentialVerifier {
    fn parse(&self, message: &IssueCredentialV1) -> Result<VerifiedCredential, VerifierError> {
        let attachment = message
            .content
            .credential_attachment()
            .map_err(|err| VerifierError::UnreadableAttachment(err.to_string()))?;
        let raw: Value = serde_json::from_str(&attachment)
            .map_err(|err| VerifierError::InvalidStructure(format!("not JSON: {err}")))?;

        let values = raw
            .get("values")
            .and_then(Value::as_object)
            .ok_or_else(|| VerifierError::InvalidStructure("missing `values` object".to_owned()))?;
        if let Some((name, _)) = values.iter().find(|(_, value)| value.get("raw").is_none()) {
            return Err(VerifierError::InvalidStructure(format!(
                "attribute `{name}` has no raw value"
            )));
        }

        let id_field = |name: &str| raw.get(name).and_then(Value::as_str).map(ToOwned::to_owned);
        Ok(VerifiedCredential {
            schema_id: id_field("schema_id"),
            cred_def_id: id_field("cred_def_id"),
            rev_reg_id: id_field("rev_reg_id"),
            values: Value::Object(values.clone()),
            raw,
        })
    }
}

#[async_trait]
impl CredentialVerifier for AttachmentCredentialVerifier {
    async fn verify(
        &self,
        message: &IssueCredentialV1,
    ) -> Result<VerifiedCredential, VerifierError> {
        trace!("AttachmentCredentialVerifier::verify >>> message id: {}", message.id);
        self.parse(message)
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};

use aries_vcx_issuance::credentials::{
    verified_credential::VerifiedCredential,
    verifier::{AttachmentCredentialVerifier, CredentialVerifier, VerifierError},
};
use async_trait::async_trait;
use messages::msg_fields::protocols::cred_issuance::v1::issue_credential::IssueCredentialV1;

/// Structural verifier that can be told to reject every signature.
#[derive(Debug, Default)]
pub struct MockVerifier {
    reject_signatures: bool,
    calls: AtomicUsize,
}

impl MockVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting() -> Self {
        Self {
            reject_signatures: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialVerifier for MockVerifier {
    async fn verify(
        &self,
        message: &IssueCredentialV1,
    ) -> Result<VerifiedCredential, VerifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_signatures {
            return Err(VerifierError::InvalidSignature(format!(
                "signature of {} does not match issuer key",
                message.id
            )));
        }
        AttachmentCredentialVerifier.verify(message).await
    }
}

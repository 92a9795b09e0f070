use super::error::{AriesVcxIssuanceError, AriesVcxIssuanceErrorKind};
use crate::credentials::{verifier::VerifierError, wallet::HolderWalletError};

impl From<VerifierError> for AriesVcxIssuanceError {
    fn from(value: VerifierError) -> Self {
        Self::from_msg(
            AriesVcxIssuanceErrorKind::CredentialVerificationError,
            value.to_string(),
        )
    }
}

impl From<HolderWalletError> for AriesVcxIssuanceError {
    fn from(value: HolderWalletError) -> Self {
        match value {
            HolderWalletError::DuplicateRecord(_)
            | HolderWalletError::InvalidCredential(_)
            | HolderWalletError::Capacity(_)
            | HolderWalletError::Backend(_) => {
                Self::from_msg(AriesVcxIssuanceErrorKind::HolderStorageError, value.to_string())
            }
        }
    }
}

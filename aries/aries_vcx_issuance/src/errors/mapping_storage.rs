use super::error::{AriesVcxIssuanceError, AriesVcxIssuanceErrorKind};
use crate::storage::RecordStoreError;

impl From<RecordStoreError> for AriesVcxIssuanceError {
    fn from(value: RecordStoreError) -> Self {
        match value {
            RecordStoreError::NotFound(_) => {
                Self::from_msg(AriesVcxIssuanceErrorKind::RecordNotFound, value.to_string())
            }
            RecordStoreError::Lock(_) => {
                Self::from_msg(AriesVcxIssuanceErrorKind::StorageError, value.to_string())
            }
            RecordStoreError::Serialization(_) => {
                Self::from_msg(AriesVcxIssuanceErrorKind::StorageError, value.to_string())
            }
            RecordStoreError::Backend(_) => {
                Self::from_msg(AriesVcxIssuanceErrorKind::StorageError, value.to_string())
            }
        }
    }
}

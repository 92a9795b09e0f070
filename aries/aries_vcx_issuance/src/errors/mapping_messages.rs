use messages::error::MessagesError;

use super::error::{AriesVcxIssuanceError, AriesVcxIssuanceErrorKind};

impl From<MessagesError> for AriesVcxIssuanceError {
    fn from(value: MessagesError) -> Self {
        let kind = match value {
            MessagesError::Serialization(_) => AriesVcxIssuanceErrorKind::SerializationError,
            MessagesError::InvalidMessageType(_)
            | MessagesError::AttachmentDecode(_)
            | MessagesError::NotUtf8(_)
            | MessagesError::UnsupportedAttachment(_)
            | MessagesError::MissingAttachment(_) => {
                AriesVcxIssuanceErrorKind::InvalidMessageFormat
            }
        };
        Self::from_msg(kind, value.to_string())
    }
}

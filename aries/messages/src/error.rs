use std::string::FromUtf8Error;

use thiserror::Error;

pub type MessagesResult<T> = Result<T, MessagesError>;

#[derive(Debug, Error)]
pub enum MessagesError {
    #[error("Unrecognized message type: {0}")]
    InvalidMessageType(String),
    #[error("Attachment is not valid base64: {0}")]
    AttachmentDecode(#[from] base64::DecodeError),
    #[error("Attachment content is not UTF-8: {0}")]
    NotUtf8(#[from] FromUtf8Error),
    #[error("Attachment type not supported here: {0}")]
    UnsupportedAttachment(String),
    #[error("Message attachment missing: {0}")]
    MissingAttachment(String),
    #[error("(De)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

use super::error::{AriesVcxIssuanceError, AriesVcxIssuanceErrorKind};

impl From<serde_json::Error> for AriesVcxIssuanceError {
    fn from(value: serde_json::Error) -> Self {
        AriesVcxIssuanceError::from_msg(AriesVcxIssuanceErrorKind::InvalidJson, value.to_string())
    }
}

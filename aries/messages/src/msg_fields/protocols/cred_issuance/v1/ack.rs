use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
    msg_fields::protocols::notification::ack::{AckContent, AckDecorators},
    msg_parts::MsgParts,
};

pub type AckCredentialV1 = MsgParts<AckCredentialV1Content, AckDecorators>;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, TypedBuilder)]
#[serde(transparent)]
pub struct AckCredentialV1Content {
    pub inner: AckContent,
}

impl From<AckContent> for AckCredentialV1Content {
    fn from(value: AckContent) -> Self {
        Self { inner: value }
    }
}

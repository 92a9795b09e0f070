use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Struct representing the `~please_ack` decorators from its [RFC](<https://github.com/hyperledger/aries-rfcs/blob/main/features/0317-please-ack/README.md>).
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, TypedBuilder)]
pub struct PleaseAck {
    // The RFC makes this a required array, but older agents send `"~please_ack": {}`.
    #[serde(default)]
    pub on: Vec<AckOn>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AckOn {
    Receipt,
    Outcome,
}

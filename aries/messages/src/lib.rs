#![allow(clippy::module_inception)]
#![allow(clippy::derive_partial_eq_without_eq)]
#![allow(clippy::large_enum_variant)]

pub mod decorators;
pub mod error;
pub mod misc;
pub mod msg_fields;
pub mod msg_parts;
pub mod msg_types;

use derive_more::From;
use serde::{
    de::Error as DeError, ser::Error as SerError, Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value;

use crate::{
    msg_fields::protocols::{
        cred_issuance::{v1::CredentialIssuanceV1, CredentialIssuance},
        notification::{ack::Ack, Notification},
        report_problem::ProblemReport,
    },
    msg_types::{
        protocols::{
            cred_issuance::CredentialIssuanceTypeV1_0, notification::NotificationTypeV1_0,
            report_problem::ReportProblemTypeV1_0,
        },
        MessageType,
    },
};

pub const MSG_TYPE: &str = "@type";

/// Enum that can represent any message this library understands.
///
/// It abstracts away the `@type` field and uses it to determine how
/// to deserialize the input into the correct message type.
///
/// It also automatically appends the correct `@type` field when serializing
/// a message.
#[derive(Clone, Debug, From, PartialEq)]
pub enum AriesMessage {
    CredentialIssuance(CredentialIssuance),
    ReportProblem(ProblemReport),
    Notification(Notification),
}

impl AriesMessage {
    pub fn msg_type(&self) -> MessageType {
        match self {
            Self::CredentialIssuance(CredentialIssuance::V1(msg)) => {
                let kind = match msg {
                    CredentialIssuanceV1::IssueCredential(_) => {
                        CredentialIssuanceTypeV1_0::IssueCredential
                    }
                    CredentialIssuanceV1::Ack(_) => CredentialIssuanceTypeV1_0::Ack,
                    CredentialIssuanceV1::ProblemReport(_) => {
                        CredentialIssuanceTypeV1_0::ProblemReport
                    }
                };
                MessageType::CredentialIssuanceV1_0(kind)
            }
            Self::ReportProblem(_) => {
                MessageType::ReportProblemV1_0(ReportProblemTypeV1_0::ProblemReport)
            }
            Self::Notification(Notification::Ack(_)) => {
                MessageType::NotificationV1_0(NotificationTypeV1_0::Ack)
            }
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::CredentialIssuance(CredentialIssuance::V1(msg)) => match msg {
                CredentialIssuanceV1::IssueCredential(m) => &m.id,
                CredentialIssuanceV1::Ack(m) => &m.id,
                CredentialIssuanceV1::ProblemReport(m) => &m.id,
            },
            Self::ReportProblem(m) => &m.id,
            Self::Notification(Notification::Ack(m)) => &m.id,
        }
    }

    /// The `~thread.thid` of the message, if it carries one.
    pub fn thread_id(&self) -> Option<&str> {
        match self {
            Self::CredentialIssuance(CredentialIssuance::V1(msg)) => match msg {
                CredentialIssuanceV1::IssueCredential(m) => Some(&m.decorators.thread.thid),
                CredentialIssuanceV1::Ack(m) => Some(&m.decorators.thread.thid),
                CredentialIssuanceV1::ProblemReport(m) => {
                    m.decorators.thread.as_ref().map(|t| t.thid.as_str())
                }
            },
            Self::ReportProblem(m) => m.decorators.thread.as_ref().map(|t| t.thid.as_str()),
            Self::Notification(Notification::Ack(m)) => Some(&m.decorators.thread.thid),
        }
    }
}

fn deserialize_as<T, E>(value: Value) -> Result<T, E>
where
    T: serde::de::DeserializeOwned,
    E: DeError,
{
    serde_json::from_value(value).map_err(E::custom)
}

impl<'de> Deserialize<'de> for AriesMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut value = Value::deserialize(deserializer)?;
        let msg_type = value
            .as_object_mut()
            .ok_or_else(|| D::Error::custom("message is not a JSON object"))?
            .remove(MSG_TYPE)
            .ok_or_else(|| D::Error::missing_field(MSG_TYPE))?;
        let msg_type = msg_type
            .as_str()
            .ok_or_else(|| D::Error::custom("@type field is not a string"))?;
        let msg_type = MessageType::try_from(msg_type).map_err(D::Error::custom)?;

        let msg = match msg_type {
            MessageType::CredentialIssuanceV1_0(kind) => {
                let msg = match kind {
                    CredentialIssuanceTypeV1_0::IssueCredential => {
                        CredentialIssuanceV1::IssueCredential(deserialize_as::<_, D::Error>(value)?)
                    }
                    CredentialIssuanceTypeV1_0::Ack => {
                        CredentialIssuanceV1::Ack(deserialize_as::<_, D::Error>(value)?)
                    }
                    CredentialIssuanceTypeV1_0::ProblemReport => {
                        CredentialIssuanceV1::ProblemReport(deserialize_as::<_, D::Error>(value)?)
                    }
                };
                AriesMessage::CredentialIssuance(CredentialIssuance::V1(msg))
            }
            MessageType::ReportProblemV1_0(ReportProblemTypeV1_0::ProblemReport) => {
                AriesMessage::ReportProblem(deserialize_as::<_, D::Error>(value)?)
            }
            MessageType::NotificationV1_0(NotificationTypeV1_0::Ack) => {
                AriesMessage::Notification(Notification::Ack(deserialize_as::<Ack, D::Error>(
                    value,
                )?))
            }
        };
        Ok(msg)
    }
}

impl Serialize for AriesMessage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value = match self {
            Self::CredentialIssuance(CredentialIssuance::V1(msg)) => match msg {
                CredentialIssuanceV1::IssueCredential(m) => serde_json::to_value(m),
                CredentialIssuanceV1::Ack(m) => serde_json::to_value(m),
                CredentialIssuanceV1::ProblemReport(m) => serde_json::to_value(m),
            },
            Self::ReportProblem(m) => serde_json::to_value(m),
            Self::Notification(Notification::Ack(m)) => serde_json::to_value(m),
        };
        let mut value = value.map_err(S::Error::custom)?;
        let Value::Object(map) = &mut value else {
            return Err(S::Error::custom("message did not serialize into a JSON object"));
        };
        map.insert(MSG_TYPE.to_owned(), Value::String(self.msg_type().to_string()));
        value.serialize(serializer)
    }
}

pub mod protocols;

use std::{fmt, str::FromStr};

use self::protocols::{
    cred_issuance::CredentialIssuanceTypeV1_0, notification::NotificationTypeV1_0,
    report_problem::ReportProblemTypeV1_0,
};
use crate::error::MessagesError;

/// Prefix emitted on every outbound `@type`.
pub const DIDCOMM_PREFIX: &str = "https://didcomm.org";
/// Legacy Sovrin prefix some agents still send, accepted on input only.
pub const DID_SOV_PREFIX: &str = "did:sov:BzCbsNYhMrjHiqZDTUASHg;spec";

/// A resolved `@type` value: the protocol, its version and the message kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageType {
    CredentialIssuanceV1_0(CredentialIssuanceTypeV1_0),
    NotificationV1_0(NotificationTypeV1_0),
    ReportProblemV1_0(ReportProblemTypeV1_0),
}

impl MessageType {
    pub const CRED_ISSUANCE_FAMILY: &'static str = "issue-credential";
    pub const NOTIFICATION_FAMILY: &'static str = "notification";
    pub const REPORT_PROBLEM_FAMILY: &'static str = "report-problem";
    pub const VERSION_1_0: &'static str = "1.0";

    fn family(&self) -> &'static str {
        match self {
            Self::CredentialIssuanceV1_0(_) => Self::CRED_ISSUANCE_FAMILY,
            Self::NotificationV1_0(_) => Self::NOTIFICATION_FAMILY,
            Self::ReportProblemV1_0(_) => Self::REPORT_PROBLEM_FAMILY,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::CredentialIssuanceV1_0(kind) => (*kind).into(),
            Self::NotificationV1_0(kind) => (*kind).into(),
            Self::ReportProblemV1_0(kind) => (*kind).into(),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            DIDCOMM_PREFIX,
            self.family(),
            Self::VERSION_1_0,
            self.kind()
        )
    }
}

impl TryFrom<&str> for MessageType {
    type Error = MessagesError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let invalid = || MessagesError::InvalidMessageType(value.to_owned());

        let rest = value
            .strip_prefix(DIDCOMM_PREFIX)
            .or_else(|| value.strip_prefix(DID_SOV_PREFIX))
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(invalid)?;

        let mut parts = rest.splitn(3, '/');
        let (Some(family), Some(version), Some(kind)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if version != Self::VERSION_1_0 {
            return Err(invalid());
        }

        let msg_type = match family {
            Self::CRED_ISSUANCE_FAMILY => Self::CredentialIssuanceV1_0(
                CredentialIssuanceTypeV1_0::from_str(kind).map_err(|_| invalid())?,
            ),
            Self::NOTIFICATION_FAMILY => {
                Self::NotificationV1_0(NotificationTypeV1_0::from_str(kind).map_err(|_| invalid())?)
            }
            Self::REPORT_PROBLEM_FAMILY => Self::ReportProblemV1_0(
                ReportProblemTypeV1_0::from_str(kind).map_err(|_| invalid())?,
            ),
            _ => return Err(invalid()),
        };
        Ok(msg_type)
    }
}

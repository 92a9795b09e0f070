pub mod ack;
pub mod issue_credential;
pub mod problem_report;

use derive_more::From;

use self::{
    ack::AckCredentialV1, issue_credential::IssueCredentialV1,
    problem_report::CredIssuanceProblemReportV1,
};
use super::CredentialIssuance;
use crate::AriesMessage;

#[derive(Clone, Debug, From, PartialEq)]
pub enum CredentialIssuanceV1 {
    IssueCredential(IssueCredentialV1),
    Ack(AckCredentialV1),
    ProblemReport(CredIssuanceProblemReportV1),
}

impl From<IssueCredentialV1> for AriesMessage {
    fn from(value: IssueCredentialV1) -> Self {
        AriesMessage::CredentialIssuance(CredentialIssuance::V1(value.into()))
    }
}

impl From<AckCredentialV1> for AriesMessage {
    fn from(value: AckCredentialV1) -> Self {
        AriesMessage::CredentialIssuance(CredentialIssuance::V1(value.into()))
    }
}

impl From<CredIssuanceProblemReportV1> for AriesMessage {
    fn from(value: CredIssuanceProblemReportV1) -> Self {
        AriesMessage::CredentialIssuance(CredentialIssuance::V1(value.into()))
    }
}

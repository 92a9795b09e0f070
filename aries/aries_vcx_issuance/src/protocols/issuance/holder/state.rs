use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum HolderState {
    ProposalSent,
    OfferReceived,
    RequestSent,
    CredentialReceived,
    Done,
    Abandoned,
}

impl HolderState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, HolderState::Done | HolderState::Abandoned)
    }
}

impl fmt::Display for HolderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HolderState::ProposalSent => "proposal-sent",
            HolderState::OfferReceived => "offer-received",
            HolderState::RequestSent => "request-sent",
            HolderState::CredentialReceived => "credential-received",
            HolderState::Done => "done",
            HolderState::Abandoned => "abandoned",
        })
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeRole {
    Holder,
    Issuer,
}

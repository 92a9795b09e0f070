//! Module containing the `issue credential` protocol messages, as defined in the [RFC](<https://github.com/hyperledger/aries-rfcs/blob/main/features/0036-issue-credential/README.md>).

pub mod v1;

use derive_more::From;

use self::v1::CredentialIssuanceV1;

#[derive(Clone, Debug, From, PartialEq)]
pub enum CredentialIssuance {
    V1(CredentialIssuanceV1),
}

//! Seams to the credential verification and holder wallet back ends.

pub mod verified_credential;
pub mod verifier;
pub mod wallet;

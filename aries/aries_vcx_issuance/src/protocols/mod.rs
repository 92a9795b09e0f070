pub mod common;
pub mod issuance;

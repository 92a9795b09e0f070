#![allow(clippy::result_large_err)]

#[macro_use]
extern crate log;

pub extern crate messages;

#[macro_use]
pub mod handlers;

pub mod credentials;
pub mod errors;
pub mod global;
pub mod protocols;
pub mod storage;
pub mod transport;

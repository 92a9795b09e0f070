pub mod error;
mod mapping_credentials;
mod mapping_messages;
mod mapping_others;
mod mapping_storage;

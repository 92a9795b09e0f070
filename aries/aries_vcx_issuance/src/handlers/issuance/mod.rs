pub mod issue_handler;
pub mod manager;

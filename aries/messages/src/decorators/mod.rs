pub mod attachment;
pub mod please_ack;
pub mod thread;
pub mod timing;

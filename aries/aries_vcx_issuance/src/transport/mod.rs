pub mod mock_responder;

use async_trait::async_trait;
use messages::AriesMessage;

use crate::errors::error::VcxIssuanceResult;

/// How an outbound message was addressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Fresh message to the connection, resolved through its routing.
    Send { connection_id: String },
    /// Back along the channel the inbound message arrived on.
    Reply,
}

#[async_trait]
pub trait Responder: Send + Sync {
    async fn send(&self, message: AriesMessage, connection_id: &str) -> VcxIssuanceResult<()>;

    async fn send_reply(&self, message: AriesMessage) -> VcxIssuanceResult<()>;
}

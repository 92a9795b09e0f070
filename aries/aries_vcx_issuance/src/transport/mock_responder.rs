use std::sync::Mutex;

use async_trait::async_trait;
use messages::AriesMessage;

use super::{Delivery, Responder};
use crate::errors::error::prelude::*;

/// Responder that records what it was asked to deliver.
#[derive(Debug, Default)]
pub struct MockResponder {
    messages: Mutex<Vec<(AriesMessage, Delivery)>>,
    fail_delivery: bool,
}

impl MockResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A responder whose every delivery fails.
    pub fn failing() -> Self {
        Self {
            messages: Mutex::default(),
            fail_delivery: true,
        }
    }

    pub fn messages(&self) -> Vec<(AriesMessage, Delivery)> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    pub fn replies(&self) -> Vec<AriesMessage> {
        self.messages()
            .into_iter()
            .filter(|(_, delivery)| *delivery == Delivery::Reply)
            .map(|(message, _)| message)
            .collect()
    }

    pub fn sent(&self) -> Vec<(AriesMessage, String)> {
        self.messages()
            .into_iter()
            .filter_map(|(message, delivery)| match delivery {
                Delivery::Send { connection_id } => Some((message, connection_id)),
                Delivery::Reply => None,
            })
            .collect()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or_default()
    }

    fn record(&self, message: AriesMessage, delivery: Delivery) -> VcxIssuanceResult<()> {
        if self.fail_delivery {
            return Err(err_msg(
                AriesVcxIssuanceErrorKind::TransportError,
                format!("Delivery of {} refused", message.id()),
            ));
        }
        self.messages
            .lock()
            .map_err(|err| err_msg(AriesVcxIssuanceErrorKind::LockError, err.to_string()))?
            .push((message, delivery));
        Ok(())
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn send(&self, message: AriesMessage, connection_id: &str) -> VcxIssuanceResult<()> {
        self.record(
            message,
            Delivery::Send {
                connection_id: connection_id.to_owned(),
            },
        )
    }

    async fn send_reply(&self, message: AriesMessage) -> VcxIssuanceResult<()> {
        self.record(message, Delivery::Reply)
    }
}

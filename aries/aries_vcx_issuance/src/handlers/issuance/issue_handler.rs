use messages::{
    msg_fields::protocols::cred_issuance::{
        v1::{issue_credential::IssueCredentialV1, CredentialIssuanceV1},
        CredentialIssuance,
    },
    AriesMessage,
};

use super::manager::{problem_report_for_record, CredentialManager};
use crate::{
    errors::error::prelude::*,
    global::settings::HolderConfig,
    protocols::issuance::holder::{record::CredentialExchangeRecord, state::HolderState},
    transport::Responder,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub connection_id: String,
    pub ready: bool,
}

impl ConnectionInfo {
    pub fn new(connection_id: &str, ready: bool) -> Self {
        Self {
            connection_id: connection_id.to_owned(),
            ready,
        }
    }
}

/// An inbound issue-credential message with what the transport knows about its sender.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub message: IssueCredentialV1,
    pub connection: Option<ConnectionInfo>,
    pub config: HolderConfig,
}

impl RequestContext {
    pub fn new(
        message: IssueCredentialV1,
        connection: Option<ConnectionInfo>,
        config: HolderConfig,
    ) -> Self {
        Self {
            message,
            connection,
            config,
        }
    }

    pub fn from_aries_message(
        message: AriesMessage,
        connection: Option<ConnectionInfo>,
        config: HolderConfig,
    ) -> VcxIssuanceResult<Self> {
        match message {
            AriesMessage::CredentialIssuance(CredentialIssuance::V1(
                CredentialIssuanceV1::IssueCredential(issue),
            )) => Ok(Self::new(issue, connection, config)),
            other => Err(AriesVcxIssuanceError::from_msg(
                AriesVcxIssuanceErrorKind::InvalidMessageFormat,
                format!("Expected issue-credential message, received {}", other.msg_type()),
            )),
        }
    }

    /// The sender's connection, if it is ready to exchange messages.
    fn ready_connection(&self) -> Option<&ConnectionInfo> {
        self.connection.as_ref().filter(|connection| connection.ready)
    }
}

fn transport_error(err: AriesVcxIssuanceError) -> AriesVcxIssuanceError {
    let msg = format!("Failed to deliver message: {}", err.msg());
    err.map(AriesVcxIssuanceErrorKind::TransportError, msg)
}

pub struct CredentialIssueHandler<M> {
    manager: M,
}

impl<M> CredentialIssueHandler<M>
where
    M: CredentialManager,
{
    pub fn new(manager: M) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &M {
        &self.manager
    }

    pub async fn handle(
        &self,
        context: &RequestContext,
        responder: &dyn Responder,
    ) -> VcxIssuanceResult<()> {
        trace!(
            "CredentialIssueHandler::handle >>> message id: {}, connection: {:?}",
            context.message.id,
            context.connection
        );
        let Some(connection) = context.ready_connection() else {
            warn!(
                "Dropping credential {}: connection not ready",
                context.message.id
            );
            return Err(AriesVcxIssuanceError::from_msg(
                AriesVcxIssuanceErrorKind::HandlerException,
                "Connection not ready",
            ));
        };

        let record = self
            .manager
            .receive_credential(context.message.clone(), &connection.connection_id)
            .await?;
        self.log_event(context, &record);

        if !context.config.auto_store_credential {
            return Ok(());
        }

        match self.manager.store_credential(record.clone()).await {
            Ok(stored) => {
                self.log_event(context, &stored);
                let ack = self.manager.create_credential_ack(&stored)?;
                responder
                    .send(ack.into(), &connection.connection_id)
                    .await
                    .map_err(transport_error)
            }
            Err(err) if err.is_recoverable_storage_failure() => {
                error!(
                    "Failed to store credential for exchange {}: {} (root cause: {})",
                    record.exchange_id,
                    err,
                    err.find_root_cause()
                );
                self.reply_problem_report(context, record, &err, responder)
                    .await
            }
            Err(err) => Err(err),
        }
    }

    async fn reply_problem_report(
        &self,
        context: &RequestContext,
        held: CredentialExchangeRecord,
        err: &AriesVcxIssuanceError,
        responder: &dyn Responder,
    ) -> VcxIssuanceResult<()> {
        let record = match self.manager.get_exchange_record(&held.exchange_id).await {
            Ok(record) if record.get_state() == HolderState::Abandoned => record,
            reloaded => {
                if let Err(fetch_err) = &reloaded {
                    warn!(
                        "Cannot reload exchange {} for problem report: {}",
                        held.exchange_id, fetch_err
                    );
                }
                self.abandon_held(held, err).await
            }
        };
        self.log_event(context, &record);

        responder
            .send_reply(problem_report_for_record(&record).into())
            .await
            .map_err(transport_error)
    }

    /// Abandons an exchange the manager left behind. When that fails too, the held copy
    /// still carries the failure so the peer gets its problem report.
    async fn abandon_held(
        &self,
        held: CredentialExchangeRecord,
        err: &AriesVcxIssuanceError,
    ) -> CredentialExchangeRecord {
        match self.manager.abandon_exchange(held.clone(), err.msg()).await {
            Ok(record) => record,
            Err(abandon_err) => {
                error!(
                    "Cannot abandon exchange {}: {}",
                    held.exchange_id, abandon_err
                );
                let mut record = held;
                record.error_msg.get_or_insert_with(|| err.msg().to_owned());
                record
            }
        }
    }

    fn log_event(&self, context: &RequestContext, record: &CredentialExchangeRecord) {
        if context.config.log_exchange_events {
            info!(
                "Credential exchange {} on connection {}: state {}, credential id {:?}",
                record.exchange_id,
                record.connection_id,
                record.get_state(),
                record.credential_id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use messages::msg_fields::protocols::report_problem::{
        Description, ProblemReport, ProblemReportContent,
    };

    use super::*;
    use crate::{
        handlers::issuance::manager::MockCredentialManager,
        protocols::{
            common::build_credential_ack,
            issuance::holder::record::tests::{issue_credential, verified_credential},
        },
        transport::{mock_responder::MockResponder, Delivery},
    };

    fn context(ready: bool, auto_store: bool) -> RequestContext {
        RequestContext::new(
            issue_credential("thread-1"),
            Some(ConnectionInfo::new("conn-1", ready)),
            HolderConfig::builder()
                .auto_store_credential(auto_store)
                .log_exchange_events(true)
                .build(),
        )
    }

    fn received_record() -> CredentialExchangeRecord {
        let mut record =
            CredentialExchangeRecord::new_holder("conn-1", "thread-1", HolderState::RequestSent);
        record
            .accept_credential(issue_credential("thread-1"), verified_credential())
            .unwrap();
        record
    }

    #[tokio::test]
    async fn test_called() {
        let mut manager = MockCredentialManager::new();
        manager
            .expect_receive_credential()
            .withf(|message, connection_id| {
                message.decorators.thread.thid == "thread-1" && connection_id == "conn-1"
            })
            .times(1)
            .returning(|_, _| Ok(received_record()));
        manager.expect_store_credential().never();
        let handler = CredentialIssueHandler::new(manager);
        let responder = MockResponder::new();

        handler.handle(&context(true, false), &responder).await.unwrap();

        assert_eq!(responder.count(), 0);
    }

    #[tokio::test]
    async fn test_called_auto_store() {
        let mut manager = MockCredentialManager::new();
        manager
            .expect_receive_credential()
            .times(1)
            .returning(|_, _| Ok(received_record()));
        manager.expect_store_credential().times(1).returning(|mut record| {
            record.mark_stored("cred-1").unwrap();
            Ok(record)
        });
        manager
            .expect_create_credential_ack()
            .times(1)
            .returning(|record| Ok(build_credential_ack(&record.thread_id)));
        let handler = CredentialIssueHandler::new(manager);
        let responder = MockResponder::new();

        handler.handle(&context(true, true), &responder).await.unwrap();

        let sent = responder.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, "conn-1");
        assert_eq!(sent[0].0.thread_id(), Some("thread-1"));
        assert!(responder.replies().is_empty());
    }

    fn abandoned_record(reason: &str) -> CredentialExchangeRecord {
        let mut record = received_record();
        record.abandon(reason).unwrap();
        record
    }

    #[tokio::test]
    async fn test_called_auto_store_x() {
        let mut manager = MockCredentialManager::new();
        manager
            .expect_receive_credential()
            .times(2)
            .returning(|_, _| Ok(received_record()));
        let mut attempts = 0;
        manager.expect_store_credential().times(2).returning(move |_| {
            attempts += 1;
            if attempts == 1 {
                Err(err_msg(
                    AriesVcxIssuanceErrorKind::HolderStorageError,
                    "wallet refused",
                ))
            } else {
                Err(err_msg(AriesVcxIssuanceErrorKind::StorageError, "disk full"))
            }
        });
        let mut reloads = 0;
        manager.expect_get_exchange_record().times(2).returning(move |_| {
            reloads += 1;
            Ok(abandoned_record(if reloads == 1 {
                "wallet refused"
            } else {
                "disk full"
            }))
        });
        manager.expect_abandon_exchange().never();
        manager.expect_create_credential_ack().never();
        let handler = CredentialIssueHandler::new(manager);
        let responder = MockResponder::new();
        let context = context(true, true);

        handler.handle(&context, &responder).await.unwrap();
        handler.handle(&context, &responder).await.unwrap();

        let messages = responder.messages();
        assert_eq!(responder.replies().len(), 2);
        assert_eq!(messages.len(), 2);
        for (message, delivery) in &messages {
            assert_eq!(*delivery, Delivery::Reply);
            assert_eq!(
                message.msg_type().to_string(),
                "https://didcomm.org/issue-credential/1.0/problem-report"
            );
            assert_eq!(message.thread_id(), Some("thread-1"));
        }
    }

    #[tokio::test]
    async fn test_unabandoned_record_is_abandoned_before_reply() {
        let mut manager = MockCredentialManager::new();
        manager
            .expect_receive_credential()
            .returning(|_, _| Ok(received_record()));
        manager.expect_store_credential().returning(|_| {
            Err(err_msg(AriesVcxIssuanceErrorKind::StorageError, "lock poisoned"))
        });
        manager
            .expect_get_exchange_record()
            .times(1)
            .returning(|_| Ok(received_record()));
        manager
            .expect_abandon_exchange()
            .withf(|record, reason| {
                record.get_state() == HolderState::CredentialReceived && reason == "lock poisoned"
            })
            .times(1)
            .returning(|_, reason| Ok(abandoned_record(reason)));
        let handler = CredentialIssueHandler::new(manager);
        let responder = MockResponder::new();

        handler.handle(&context(true, true), &responder).await.unwrap();

        let replies = responder.replies();
        assert_eq!(replies.len(), 1);
        let AriesMessage::CredentialIssuance(CredentialIssuance::V1(
            CredentialIssuanceV1::ProblemReport(report),
        )) = &replies[0]
        else {
            panic!("expected problem report, got {:?}", replies[0]);
        };
        assert_eq!(report.content.inner.description.en.as_deref(), Some("lock poisoned"));
    }

    #[tokio::test]
    async fn test_problem_report_uses_held_record_when_reload_fails() {
        let mut manager = MockCredentialManager::new();
        manager
            .expect_receive_credential()
            .returning(|_, _| Ok(received_record()));
        manager
            .expect_store_credential()
            .returning(|_| Err(err_msg(AriesVcxIssuanceErrorKind::StorageError, "disk full")));
        manager
            .expect_get_exchange_record()
            .returning(|_| Err(err_msg(AriesVcxIssuanceErrorKind::StorageError, "disk full")));
        manager
            .expect_abandon_exchange()
            .times(1)
            .returning(|_, _| Err(err_msg(AriesVcxIssuanceErrorKind::StorageError, "disk full")));
        let handler = CredentialIssueHandler::new(manager);
        let responder = MockResponder::new();

        handler.handle(&context(true, true), &responder).await.unwrap();

        let replies = responder.replies();
        assert_eq!(replies.len(), 1);
        let AriesMessage::CredentialIssuance(CredentialIssuance::V1(
            CredentialIssuanceV1::ProblemReport(report),
        )) = &replies[0]
        else {
            panic!("expected problem report, got {:?}", replies[0]);
        };
        assert_eq!(report.content.inner.description.en.as_deref(), Some("disk full"));
    }

    #[tokio::test]
    async fn test_other_store_errors_propagate() {
        let mut manager = MockCredentialManager::new();
        manager
            .expect_receive_credential()
            .returning(|_, _| Ok(received_record()));
        manager
            .expect_store_credential()
            .returning(|_| Err(err_msg(AriesVcxIssuanceErrorKind::InvalidState, "already done")));
        let handler = CredentialIssueHandler::new(manager);
        let responder = MockResponder::new();

        let err = handler.handle(&context(true, true), &responder).await.unwrap_err();

        assert_eq!(err.kind(), AriesVcxIssuanceErrorKind::InvalidState);
        assert_eq!(responder.count(), 0);
    }

    #[tokio::test]
    async fn test_verification_error_surfaces_without_reply() {
        let mut manager = MockCredentialManager::new();
        manager.expect_receive_credential().returning(|_, _| {
            Err(err_msg(
                AriesVcxIssuanceErrorKind::CredentialVerificationError,
                "bad signature",
            ))
        });
        manager.expect_store_credential().never();
        let handler = CredentialIssueHandler::new(manager);
        let responder = MockResponder::new();

        let err = handler.handle(&context(true, true), &responder).await.unwrap_err();

        assert_eq!(err.kind(), AriesVcxIssuanceErrorKind::CredentialVerificationError);
        assert_eq!(responder.count(), 0);
    }

    #[tokio::test]
    async fn test_called_not_ready() {
        for connection in [None, Some(ConnectionInfo::new("conn-1", false))] {
            let mut manager = MockCredentialManager::new();
            manager.expect_receive_credential().never();
            let handler = CredentialIssueHandler::new(manager);
            let responder = MockResponder::new();
            let context = RequestContext::new(
                issue_credential("thread-1"),
                connection,
                HolderConfig::builder().auto_store_credential(true).build(),
            );

            let err = handler.handle(&context, &responder).await.unwrap_err();

            assert_eq!(err.kind(), AriesVcxIssuanceErrorKind::HandlerException);
            assert_eq!(responder.count(), 0);
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported() {
        let mut manager = MockCredentialManager::new();
        manager
            .expect_receive_credential()
            .returning(|_, _| Ok(received_record()));
        manager.expect_store_credential().returning(|mut record| {
            record.mark_stored("cred-1").unwrap();
            Ok(record)
        });
        manager
            .expect_create_credential_ack()
            .returning(|record| Ok(build_credential_ack(&record.thread_id)));
        let handler = CredentialIssueHandler::new(manager);

        let err = handler
            .handle(&context(true, true), &MockResponder::failing())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), AriesVcxIssuanceErrorKind::TransportError);
    }

    #[test]
    fn test_context_from_aries_message() {
        let issue: AriesMessage = issue_credential("thread-1").into();
        let context =
            RequestContext::from_aries_message(issue, None, HolderConfig::default()).unwrap();
        assert_eq!(context.message.decorators.thread.thid, "thread-1");

        let report: AriesMessage = ProblemReport::builder()
            .id("pr-1".to_owned())
            .content(
                ProblemReportContent::builder()
                    .description(Description::builder().code("x".to_owned()).build())
                    .build(),
            )
            .decorators(Default::default())
            .build()
            .into();
        let err =
            RequestContext::from_aries_message(report, None, HolderConfig::default()).unwrap_err();
        assert_eq!(err.kind(), AriesVcxIssuanceErrorKind::InvalidMessageFormat);
    }
}

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
    decorators::{attachment::Attachment, please_ack::PleaseAck, thread::Thread, timing::Timing},
    error::{MessagesError, MessagesResult},
    msg_parts::MsgParts,
};

pub type IssueCredentialV1 = MsgParts<IssueCredentialV1Content, IssueCredentialV1Decorators>;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, TypedBuilder)]
pub struct IssueCredentialV1Content {
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "credentials~attach")]
    pub credentials_attach: Vec<Attachment>,
}

impl IssueCredentialV1Content {
    /// The credential carried by the first `credentials~attach` entry.
    pub fn credential_attachment(&self) -> MessagesResult<String> {
        self.credentials_attach
            .first()
            .ok_or_else(|| MessagesError::MissingAttachment("credentials~attach".to_owned()))?
            .content_as_string()
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, TypedBuilder)]
pub struct IssueCredentialV1Decorators {
    #[serde(rename = "~thread")]
    pub thread: Thread,
    #[builder(default, setter(strip_option))]
    #[serde(rename = "~please_ack")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub please_ack: Option<PleaseAck>,
    #[builder(default, setter(strip_option))]
    #[serde(rename = "~timing")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<Timing>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::decorators::thread::tests::make_extended_thread;

    #[test]
    fn test_issue_credential_fields() {
        let content = IssueCredentialV1Content::builder()
            .credentials_attach(vec![Attachment::from_json_str("libindy-cred-0", "{}")])
            .comment("test_comment".to_owned())
            .build();
        let decorators = IssueCredentialV1Decorators::builder()
            .thread(make_extended_thread())
            .build();
        let msg = IssueCredentialV1::builder()
            .id("test".to_owned())
            .content(content)
            .decorators(decorators)
            .build();

        let expected = json!({
            "@id": "test",
            "comment": "test_comment",
            "credentials~attach": msg.content.credentials_attach,
            "~thread": msg.decorators.thread
        });
        assert_eq!(serde_json::to_value(&msg).unwrap(), expected);
        assert_eq!(msg.content.credential_attachment().unwrap(), "{}");
    }

    #[test]
    fn test_missing_attachment_is_an_error() {
        let content = IssueCredentialV1Content::builder()
            .credentials_attach(vec![])
            .build();

        assert!(matches!(
            content.credential_attachment(),
            Err(MessagesError::MissingAttachment(_))
        ));
    }
}

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use typed_builder::TypedBuilder;

use crate::{
    error::{MessagesError, MessagesResult},
    misc::MimeType,
};

/// Struct representing the `~attach` decorator from its [RFC](<https://github.com/hyperledger/aries-rfcs/blob/main/concepts/0017-attachments/README.md>).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, TypedBuilder)]
pub struct Attachment {
    #[builder(default, setter(strip_option))]
    #[serde(rename = "@id")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[builder(default, setter(strip_option))]
    #[serde(rename = "mime-type")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<MimeType>,
    pub data: AttachmentData,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, TypedBuilder)]
pub struct AttachmentData {
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jws: Option<String>,
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(flatten)]
    pub content: AttachmentType,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentType {
    Base64(String),
    Json(Value),
    Links(Vec<String>),
}

impl Attachment {
    /// Builds a base64 encoded JSON attachment, the shape used by `credentials~attach`.
    pub fn from_json_str(id: &str, json: &str) -> Self {
        let data = AttachmentData::builder()
            .content(AttachmentType::Base64(STANDARD.encode(json)))
            .build();
        Attachment::builder()
            .id(id.to_owned())
            .mime_type(MimeType::Json)
            .data(data)
            .build()
    }

    /// Returns the inline content of the attachment as a string.
    pub fn content_as_string(&self) -> MessagesResult<String> {
        match &self.data.content {
            AttachmentType::Base64(encoded) => {
                let bytes = STANDARD.decode(encoded)?;
                Ok(String::from_utf8(bytes)?)
            }
            AttachmentType::Json(value) => Ok(value.to_string()),
            AttachmentType::Links(links) => Err(MessagesError::UnsupportedAttachment(format!(
                "links attachment cannot be read inline: {links:?}"
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_base64_attachment_round_trips_content() {
        let attach = Attachment::from_json_str("libindy-cred-0", r#"{"values":{}}"#);

        assert_eq!(
            serde_json::to_value(&attach).unwrap(),
            json!({
                "@id": "libindy-cred-0",
                "mime-type": "application/json",
                "data": { "base64": "eyJ2YWx1ZXMiOnt9fQ==" }
            })
        );
        assert_eq!(attach.content_as_string().unwrap(), r#"{"values":{}}"#);
    }

    #[test]
    fn test_invalid_base64_is_an_error() {
        let attach = Attachment::builder()
            .data(
                AttachmentData::builder()
                    .content(AttachmentType::Base64("not base64!".to_owned()))
                    .build(),
            )
            .build();

        assert!(matches!(
            attach.content_as_string(),
            Err(MessagesError::AttachmentDecode(_))
        ));
    }

    #[test]
    fn test_links_cannot_be_read_inline() {
        let attach = Attachment::builder()
            .data(
                AttachmentData::builder()
                    .content(AttachmentType::Links(vec!["https://example.org/cred".to_owned()]))
                    .build(),
            )
            .build();

        assert!(matches!(
            attach.content_as_string(),
            Err(MessagesError::UnsupportedAttachment(_))
        ));
    }
}

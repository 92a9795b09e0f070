use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use typed_builder::TypedBuilder;

/// A received credential whose content the verifier accepted.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, TypedBuilder)]
pub struct VerifiedCredential {
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cred_def_id: Option<String>,
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rev_reg_id: Option<String>,
    pub values: Value,
    pub raw: Value,
}

impl VerifiedCredential {
    /// Raw attribute values, keyed by attribute name.
    pub fn attributes(&self) -> HashMap<String, String> {
        let Some(values) = self.values.as_object() else {
            return HashMap::new();
        };
        values
            .iter()
            .filter_map(|(name, value)| {
                let raw = match value.get("raw")? {
                    Value::String(raw) => raw.clone(),
                    other => other.to_string(),
                };
                Some((name.clone(), raw))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_attributes_reads_raw_values() {
        let credential = VerifiedCredential::builder()
            .values(json!({
                "name": { "raw": "Alice", "encoded": "1139481716457488690172217916278103335" },
                "age": { "raw": 25, "encoded": "25" },
                "broken": { "encoded": "1" }
            }))
            .raw(json!({}))
            .build();

        let attributes = credential.attributes();
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes["name"], "Alice");
        assert_eq!(attributes["age"], "25");
    }
}

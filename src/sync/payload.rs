// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The secret envelope DSM expects on upsert

use crate::constants::dsm;
use crate::error::Result;
use crate::types::SecretValue;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use std::fmt;

/// Body of the DSM secret upsert call.
///
/// `data` holds the base64 encoding of `{"key_value":{"fields":{"VALUE":<value>}}}`.
#[derive(Serialize, Clone, PartialEq, Eq)]
pub struct TargetSecretPayload {
    pub identity: String,
    pub name: String,
    pub engine: String,
    pub description: String,
    pub data: String,
}

#[derive(Serialize)]
struct KeyValueDocument<'a> {
    key_value: KeyValue<'a>,
}

#[derive(Serialize)]
struct KeyValue<'a> {
    fields: Fields<'a>,
}

#[derive(Serialize)]
struct Fields<'a> {
    #[serde(rename = "VALUE")]
    value: &'a str,
}

impl TargetSecretPayload {
    pub fn new(
        identity: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        value: &SecretValue,
    ) -> Result<Self> {
        Ok(Self {
            identity: identity.into(),
            name: name.into(),
            engine: dsm::ENGINE.to_string(),
            description: description.into(),
            data: encode_secret_data(value)?,
        })
    }
}

impl fmt::Debug for TargetSecretPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetSecretPayload")
            .field("identity", &self.identity)
            .field("name", &self.name)
            .field("engine", &self.engine)
            .field("description", &self.description)
            .field("data", &"<redacted>")
            .finish()
    }
}

/// Wrap a secret value in the key/value document and base64-encode it
pub fn encode_secret_data(value: &SecretValue) -> Result<String> {
    let document = KeyValueDocument {
        key_value: KeyValue {
            fields: Fields {
                value: value.expose(),
            },
        },
    };

    Ok(STANDARD.encode(serde_json::to_vec(&document)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(data: &str) -> String {
        String::from_utf8(STANDARD.decode(data).unwrap()).unwrap()
    }

    #[test]
    fn test_encode_secret_data_exact_document() {
        let data = encode_secret_data(&SecretValue::new("s3cr3t")).unwrap();

        assert_eq!(decode(&data), r#"{"key_value":{"fields":{"VALUE":"s3cr3t"}}}"#);
        assert_eq!(data, "eyJrZXlfdmFsdWUiOnsiZmllbGRzIjp7IlZBTFVFIjoiczNjcjN0In19fQ==");
    }

    #[test]
    fn test_encode_secret_data_escapes_json() {
        let value = "line1\n\"quoted\" \\ ünïcode";
        let data = encode_secret_data(&SecretValue::new(value)).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&decode(&data)).unwrap();
        assert_eq!(parsed, json!({ "key_value": { "fields": { "VALUE": value } } }));
    }

    #[test]
    fn test_payload_fields() {
        let payload = TargetSecretPayload::new(
            "platform-team",
            "db-password",
            "Synchronized from Azure Key Vault",
            &SecretValue::new("s3cr3t"),
        )
        .unwrap();

        let body = serde_json::to_value(&payload).unwrap();
        let keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();

        assert_eq!(keys.len(), 5);
        assert_eq!(body["identity"], "platform-team");
        assert_eq!(body["name"], "db-password");
        assert_eq!(body["engine"], "Generic");
        assert_eq!(body["description"], "Synchronized from Azure Key Vault");
        assert_eq!(
            decode(body["data"].as_str().unwrap()),
            r#"{"key_value":{"fields":{"VALUE":"s3cr3t"}}}"#
        );
    }

    #[test]
    fn test_payload_debug_hides_data() {
        let payload =
            TargetSecretPayload::new("id", "db-password", "d", &SecretValue::new("s3cr3t"))
                .unwrap();
        let rendered = format!("{:?}", payload);

        assert!(!rendered.contains(&payload.data));
        assert!(rendered.contains("db-password"));
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::events;
use serde::Deserialize;
use serde_json::Value;

/// An Event Grid notification, in either the Event Grid or CloudEvents schema.
///
/// Only the data payload's object name drives behavior; the envelope fields are
/// kept for logging.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeNotification {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "source")]
    pub topic: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default, alias = "type")]
    pub event_type: Option<String>,
    #[serde(default, alias = "time")]
    pub event_time: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl ChangeNotification {
    /// Decode an event that may arrive either as a JSON object or as a string
    /// holding the serialized object
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        match value {
            Value::String(raw) => serde_json::from_str(&raw),
            other => serde_json::from_value(other),
        }
    }

    /// Name of the changed secret, if the payload carries a non-blank one
    pub fn object_name(&self) -> Option<&str> {
        self.data_field("ObjectName", "objectName")
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn vault_name(&self) -> Option<&str> {
        self.data_field("VaultName", "vaultName")
    }

    pub fn object_type(&self) -> Option<&str> {
        self.data_field("ObjectType", "objectType")
    }

    pub fn version(&self) -> Option<&str> {
        self.data_field("Version", "version")
    }

    pub fn event_type(&self) -> &str {
        self.event_type.as_deref().unwrap_or_default()
    }

    pub fn is_subscription_validation(&self) -> bool {
        self.event_type() == events::SUBSCRIPTION_VALIDATION
    }

    /// Code to echo back when answering the webhook validation handshake
    pub fn validation_code(&self) -> Option<&str> {
        self.data_field("validationCode", "ValidationCode")
    }

    fn data_field(&self, pascal: &str, camel: &str) -> Option<&str> {
        self.data
            .get(pascal)
            .or_else(|| self.data.get(camel))
            .and_then(Value::as_str)
    }
}

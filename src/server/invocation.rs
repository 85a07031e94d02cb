// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Azure Functions custom handler invocation payloads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body the Functions host posts for each trigger invocation
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct InvokeRequest {
    /// Trigger and input bindings, keyed by binding name
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub metadata: Value,
}

impl InvokeRequest {
    /// The payload of the named binding, or the only binding when there is exactly one
    pub fn binding(&self, name: &str) -> Option<&Value> {
        self.data.get(name).or_else(|| {
            if self.data.len() == 1 {
                self.data.values().next()
            } else {
                None
            }
        })
    }
}

/// Body returned to the Functions host
#[derive(Serialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct InvokeResponse {
    pub outputs: Map<String, Value>,
    /// Lines the host appends to the invocation log
    pub logs: Vec<String>,
    pub return_value: Option<Value>,
}

impl InvokeResponse {
    pub fn with_log(message: impl Into<String>) -> Self {
        Self {
            logs: vec![message.into()],
            ..Default::default()
        }
    }
}

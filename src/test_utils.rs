// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking the outbound HTTP services.

use crate::transport::HttpClient;
use bytes::Bytes;
use http::{HeaderMap, Request, Response};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::{BoxError, Service};

/// A request observed by [`MockService`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap()
    }

    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// `METHOD /path` shorthand for asserting call order
    pub fn route(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[derive(Clone)]
enum Canned {
    Respond(u16, String),
    Fail(String),
}

/// A mock HTTP service that returns predefined responses based on request paths
/// and records every request it receives.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), Canned>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.insert("GET", path, Canned::Respond(status, body.to_string()))
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.insert("POST", path, Canned::Respond(status, body.to_string()))
    }

    /// Fail any request to this path at the transport level
    pub fn fail_on(self, path: &str, message: &str) -> Self {
        for method in ["GET", "POST"] {
            self.responses.lock().unwrap().insert(
                (method.to_string(), path.to_string()),
                Canned::Fail(message.to_string()),
            );
        }
        self
    }

    /// Build an [`HttpClient`] from this mock service
    pub fn into_client(self) -> HttpClient {
        HttpClient::new(self)
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn routes(&self) -> Vec<String> {
        self.requests().iter().map(RecordedRequest::route).collect()
    }

    fn insert(self, method: &str, path: &str, canned: Canned) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), canned);
        self
    }

    fn find_response(&self, method: &str, path: &str) -> Option<Canned> {
        let responses = self.responses.lock().unwrap();

        // Try exact match first
        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        // Try prefix match for paths with a dynamic tail
        for ((m, p), resp) in responses.iter() {
            if m == method && path.starts_with(p) {
                return Some(resp.clone());
            }
        }

        None
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Bytes>> for MockService {
    type Response = Response<Bytes>;
    type Error = BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Bytes>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let response = self.find_response(&method, &path);

        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path,
            query: req.uri().query().map(str::to_string),
            headers: req.headers().clone(),
            body: req.body().clone(),
        });

        Box::pin(async move {
            match response {
                Some(Canned::Respond(status, body)) => Ok(Response::builder()
                    .status(status)
                    .header("content-type", "application/json")
                    .body(Bytes::from(body))
                    .unwrap()),
                Some(Canned::Fail(message)) => Err(message.into()),
                None => {
                    // Default 404 for unmatched requests
                    let body = r#"{"error":{"code":"NotFound","message":"not found"}}"#;
                    Ok(Response::builder()
                        .status(404)
                        .header("content-type", "application/json")
                        .body(Bytes::from_static(body.as_bytes()))
                        .unwrap())
                }
            }
        })
    }
}

/// Parse a `k=v&k=v` query or form body into a map
pub fn form_pairs(encoded: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(encoded.as_bytes())
        .into_owned()
        .collect()
}

/// Identity endpoint token response
pub fn token_json(access_token: &str) -> String {
    serde_json::json!({
        "access_token": access_token,
        "expires_in": "3599",
        "token_type": "Bearer"
    })
    .to_string()
}

/// Key Vault secret bundle response
pub fn secret_bundle_json(vault: &str, name: &str, value: &str) -> String {
    serde_json::json!({
        "value": value,
        "id": format!("https://{}.vault.azure.net/secrets/{}/0123456789abcdef", vault, name),
        "attributes": {
            "enabled": true,
            "created": 1700000000,
            "updated": 1700000000,
            "recoveryLevel": "Recoverable+Purgeable"
        }
    })
    .to_string()
}

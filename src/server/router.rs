// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Request routing for the custom handler and Event Grid webhook endpoints.

use crate::constants::server::{HEALTH_PATH, WEBHOOK_PATH};
use crate::server::invocation::{InvokeRequest, InvokeResponse};
use crate::sync::{SecretSyncHandler, SyncOutcome};
use crate::types::ChangeNotification;
use bytes::Bytes;
use http::{header, HeaderValue, Method, Request, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

const WEBHOOK_ORIGIN_HEADER: &str = "webhook-request-origin";
const WEBHOOK_ALLOWED_ORIGIN_HEADER: &str = "webhook-allowed-origin";

pub struct Router {
    handler: SecretSyncHandler,
    function_path: String,
    event_binding: String,
}

impl Router {
    pub fn new(handler: SecretSyncHandler, function_name: &str, event_binding: &str) -> Self {
        Self {
            handler,
            function_path: format!("/{}", function_name.trim_matches('/')),
            event_binding: event_binding.to_string(),
        }
    }

    /// Dispatch a fully buffered request
    pub async fn route(&self, request: Request<Bytes>) -> Response<Full<Bytes>> {
        let path = request.uri().path();
        debug!("{} {}", request.method(), path);

        match (request.method(), path) {
            (&Method::GET, HEALTH_PATH) => text_response(StatusCode::OK, "ok"),
            (&Method::POST, p) if p == self.function_path => {
                self.handle_invocation(request.body()).await
            }
            (&Method::POST, WEBHOOK_PATH) => self.handle_webhook(request.body()).await,
            (&Method::OPTIONS, WEBHOOK_PATH) => webhook_abuse_protection(&request),
            (_, p) if p == self.function_path || p == WEBHOOK_PATH || p == HEALTH_PATH => {
                text_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
            }
            _ => text_response(StatusCode::NOT_FOUND, "not found"),
        }
    }

    /// Custom handler invocation forwarded by the Functions host
    async fn handle_invocation(&self, body: &Bytes) -> Response<Full<Bytes>> {
        let invocation: InvokeRequest = match serde_json::from_slice(body) {
            Ok(i) => i,
            Err(e) => {
                warn!("Malformed invocation payload: {}", e);
                return json_response(
                    StatusCode::BAD_REQUEST,
                    &InvokeResponse::with_log(format!("malformed invocation payload: {}", e)),
                );
            }
        };

        let Some(event) = invocation.binding(&self.event_binding) else {
            warn!("Invocation has no '{}' binding, skipping", self.event_binding);
            return json_response(
                StatusCode::OK,
                &InvokeResponse::with_log(format!(
                    "no '{}' binding in invocation",
                    self.event_binding
                )),
            );
        };

        let notification = match ChangeNotification::from_value(event.clone()) {
            Ok(n) => n,
            Err(e) => {
                warn!("Malformed event in invocation: {}", e);
                return json_response(
                    StatusCode::BAD_REQUEST,
                    &InvokeResponse::with_log(format!("malformed event: {}", e)),
                );
            }
        };

        match self.handler.handle(&notification).await {
            Ok(outcome) => json_response(
                StatusCode::OK,
                &InvokeResponse::with_log(describe(&outcome)),
            ),
            Err(e) => json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &InvokeResponse::with_log(format!("secret sync failed: {}", e)),
            ),
        }
    }

    /// Direct Event Grid delivery: a batch of events, or the validation handshake
    async fn handle_webhook(&self, body: &Bytes) -> Response<Full<Bytes>> {
        let events = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Array(events)) => events,
            Ok(event @ Value::Object(_)) => vec![event],
            Ok(_) => {
                return text_response(
                    StatusCode::BAD_REQUEST,
                    "expected an event or an array of events",
                )
            }
            Err(e) => {
                warn!("Malformed webhook payload: {}", e);
                return text_response(StatusCode::BAD_REQUEST, "malformed JSON");
            }
        };

        let mut synced = 0;
        let mut skipped = 0;

        for event in events {
            let notification = match ChangeNotification::from_value(event) {
                Ok(n) => n,
                Err(e) => {
                    warn!("Malformed event in webhook batch: {}", e);
                    return text_response(StatusCode::BAD_REQUEST, "malformed event");
                }
            };

            if notification.is_subscription_validation() {
                let Some(code) = notification.validation_code() else {
                    return text_response(StatusCode::BAD_REQUEST, "validation event without code");
                };
                info!("Answering Event Grid subscription validation");
                return json_response(StatusCode::OK, &json!({ "validationResponse": code }));
            }

            match self.handler.handle(&notification).await {
                Ok(SyncOutcome::Synced { .. }) => synced += 1,
                Ok(SyncOutcome::Skipped(_)) => skipped += 1,
                Err(e) => {
                    return text_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        &format!("secret sync failed: {}", e),
                    )
                }
            }
        }

        json_response(StatusCode::OK, &json!({ "synced": synced, "skipped": skipped }))
    }
}

fn describe(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::Synced { name } => format!("secret {} synced to DSM", name),
        SyncOutcome::Skipped(reason) => format!("skipped: {}", reason),
    }
}

/// CloudEvents webhook validation: echo the requesting origin back as allowed
fn webhook_abuse_protection(request: &Request<Bytes>) -> Response<Full<Bytes>> {
    let origin = request
        .headers()
        .get(WEBHOOK_ORIGIN_HEADER)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"));

    let mut response = text_response(StatusCode::OK, "");
    response.headers_mut().insert(WEBHOOK_ALLOWED_ORIGIN_HEADER, origin);
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(bytes) => {
            let mut response = Response::new(Full::new(Bytes::from(bytes)));
            *response.status_mut() = status;
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
            response
        }
        Err(e) => text_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

fn text_response(status: StatusCode, body: &str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

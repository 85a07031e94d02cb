// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Outbound HTTP plumbing shared by the Azure and DSM clients.
//!
//! Requests go through a boxed tower [`Service`] so tests can swap the network
//! transport for a mock.

use crate::error::{Result, SyncError};
use bytes::Bytes;
use http::{Request, Response};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tower::util::BoxCloneSyncService;
use tower::{BoxError, Service, ServiceExt};
use tracing::{debug, instrument};
use url::Url;

/// Cloneable handle to the outbound transport
#[derive(Clone)]
pub struct HttpClient {
    service: BoxCloneSyncService<Request<Bytes>, Response<Bytes>, BoxError>,
}

impl HttpClient {
    /// Wrap any tower service speaking buffered `http` requests
    pub fn new<S>(service: S) -> Self
    where
        S: Service<Request<Bytes>, Response = Response<Bytes>, Error = BoxError>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        Self {
            service: BoxCloneSyncService::new(service),
        }
    }

    /// Create a client backed by reqwest with the given request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::new(ReqwestTransport { client }))
    }

    /// Send a request and return the raw response, whatever its status
    #[instrument(skip(self, request), fields(method = %request.method(), uri = %request.uri()))]
    pub async fn send(
        &self,
        service: &'static str,
        request: Request<Bytes>,
    ) -> Result<Response<Bytes>> {
        let response = self
            .service
            .clone()
            .oneshot(request)
            .await
            .map_err(|source| SyncError::Transport { service, source })?;

        debug!(status = %response.status(), "{} responded", service);
        Ok(response)
    }

    /// Send a request, require a 2xx status and decode the JSON body
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        service: &'static str,
        request: Request<Bytes>,
    ) -> Result<T> {
        let response = ensure_success(service, self.send(service, request).await?)?;

        serde_json::from_slice(response.body())
            .map_err(|source| SyncError::Decode { service, source })
    }
}

/// Turn a non-2xx response into [`SyncError::Status`]
pub fn ensure_success(service: &'static str, response: Response<Bytes>) -> Result<Response<Bytes>> {
    if response.status().is_success() {
        return Ok(response);
    }

    Err(SyncError::Status {
        service,
        status: response.status(),
        body: String::from_utf8_lossy(response.body()).into_owned(),
    })
}

/// Append path segments to a base URL, keeping any path prefix it already has
pub fn join_segments(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| SyncError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Production transport over a pooled reqwest client
#[derive(Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl Service<Request<Bytes>> for ReqwestTransport {
    type Response = Response<Bytes>;
    type Error = BoxError;
    type Future =
        Pin<Box<dyn Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(
        &mut self,
        _cx: &mut Context<'_>,
    ) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Bytes>) -> Self::Future {
        let client = self.client.clone();

        Box::pin(async move {
            let request = reqwest::Request::try_from(req)?;
            let response = client.execute(request).await?;

            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?;

            let mut out = Response::new(body);
            *out.status_mut() = status;
            *out.headers_mut() = headers;
            Ok(out)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockService;
    use http::{Method, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Pong {
        pong: bool,
    }

    fn get(uri: &str) -> Request<Bytes> {
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Bytes::new())
            .unwrap()
    }

    #[test]
    fn test_join_segments_on_bare_host() {
        let base = Url::parse("https://dsm.example.com").unwrap();
        let url = join_segments(&base, &["iso", "oauth2", "token"]).unwrap();

        assert_eq!(url.as_str(), "https://dsm.example.com/iso/oauth2/token");
    }

    #[test]
    fn test_join_segments_keeps_prefix_and_trailing_slash() {
        let base = Url::parse("https://gateway.example.com/dsm/").unwrap();
        let url = join_segments(&base, &["iso", "sctm", "secret"]).unwrap();

        assert_eq!(url.as_str(), "https://gateway.example.com/dsm/iso/sctm/secret");
    }

    #[test]
    fn test_join_segments_escapes_segment() {
        let base = Url::parse("https://myvault.vault.azure.net").unwrap();
        let url = join_segments(&base, &["secrets", "a/b"]).unwrap();

        assert_eq!(url.path(), "/secrets/a%2Fb");
    }

    #[tokio::test]
    async fn test_send_json_decodes_success() {
        let client = MockService::new()
            .on_get("/ping", 200, r#"{"pong":true}"#)
            .into_client();

        let pong: Pong = client.send_json("test", get("https://svc.local/ping")).await.unwrap();
        assert!(pong.pong);
    }

    #[tokio::test]
    async fn test_send_json_surfaces_status_and_body() {
        let client = MockService::new()
            .on_get("/ping", 503, "maintenance")
            .into_client();

        let err = client
            .send_json::<Pong>("test", get("https://svc.local/ping"))
            .await
            .unwrap_err();

        match err {
            SyncError::Status { service, status, body } => {
                assert_eq!(service, "test");
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_json_reports_decode_failure() {
        let client = MockService::new()
            .on_get("/ping", 200, "not json")
            .into_client();

        let err = client
            .send_json::<Pong>("test", get("https://svc.local/ping"))
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::Decode { service: "test", .. }));
    }

    #[tokio::test]
    async fn test_send_maps_transport_failure() {
        let client = MockService::new().fail_on("/ping", "connection refused").into_client();

        let err = client.send("test", get("https://svc.local/ping")).await.unwrap_err();

        match err {
            SyncError::Transport { service, source } => {
                assert_eq!(service, "test");
                assert_eq!(source.to_string(), "connection refused");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}

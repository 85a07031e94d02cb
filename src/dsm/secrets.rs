// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secret upsert against the DSM secret endpoint

use crate::constants::dsm;
use crate::error::Result;
use crate::sync::TargetSecretPayload;
use crate::transport::{ensure_success, join_segments, HttpClient};
use crate::types::BearerToken;
use bytes::Bytes;
use http::{header, Method, Request};
use tracing::{info, instrument};
use url::Url;

const SERVICE: &str = "DSM secret endpoint";

/// Create or update a secret in DSM. Any 2xx response counts as success.
#[instrument(skip(http, base_url, token, payload), fields(secret = %payload.name))]
pub async fn upsert_secret(
    http: &HttpClient,
    base_url: &Url,
    token: &BearerToken,
    payload: &TargetSecretPayload,
) -> Result<()> {
    let url = join_segments(base_url, &dsm::SECRET_PATH)?;

    let request = Request::builder()
        .method(Method::POST)
        .uri(url.as_str())
        .header(header::AUTHORIZATION, token.header_value()?)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "application/json")
        .body(Bytes::from(serde_json::to_vec(payload)?))?;

    let response = ensure_success(SERVICE, http.send(SERVICE, request).await?)?;

    info!(status = %response.status(), "Upserted secret {} in DSM", payload.name);
    Ok(())
}

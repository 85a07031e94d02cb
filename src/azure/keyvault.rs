// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Key Vault secret reads over the REST API

use crate::constants::azure;
use crate::error::{Result, SyncError};
use crate::transport::{join_segments, HttpClient};
use crate::types::{BearerToken, SecretValue};
use bytes::Bytes;
use http::{header, Method, Request};
use serde::Deserialize;
use tracing::{info, instrument};
use url::Url;

const SERVICE: &str = "Key Vault";

#[derive(Deserialize)]
struct SecretBundle {
    value: Option<String>,
}

/// Fetch the current value of a secret
#[instrument(skip(http, vault_url, token), fields(vault = %vault_url))]
pub async fn get_secret(
    http: &HttpClient,
    vault_url: &Url,
    token: &BearerToken,
    name: &str,
) -> Result<SecretValue> {
    let mut url = join_segments(vault_url, &["secrets", name])?;
    url.query_pairs_mut()
        .append_pair("api-version", azure::KEY_VAULT_API_VERSION);

    let request = Request::builder()
        .method(Method::GET)
        .uri(url.as_str())
        .header(header::AUTHORIZATION, token.header_value()?)
        .header(header::ACCEPT, "application/json")
        .body(Bytes::new())?;

    let bundle: SecretBundle = http.send_json(SERVICE, request).await?;

    let value = bundle.value.ok_or(SyncError::MissingField {
        service: SERVICE,
        field: "value",
    })?;

    info!("Fetched secret {} from Key Vault", name);
    Ok(SecretValue::new(value))
}

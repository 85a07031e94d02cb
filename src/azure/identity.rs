// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Managed identity token acquisition.
//!
//! Inside App Service and Functions the platform exposes `IDENTITY_ENDPOINT`
//! and `IDENTITY_HEADER`; everywhere else the Instance Metadata Service is used.

use crate::config::{IdentityEndpoint, SyncConfig};
use crate::constants::azure;
use crate::error::{Result, SyncError};
use crate::transport::HttpClient;
use crate::types::BearerToken;
use bytes::Bytes;
use http::{header, HeaderValue, Method, Request};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

const SERVICE: &str = "managed identity";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Obtain a token for `resource` from the platform's managed identity endpoint
#[instrument(skip(http, config), fields(endpoint = ?config.identity_endpoint))]
pub async fn acquire_token(
    http: &HttpClient,
    config: &SyncConfig,
    resource: &str,
) -> Result<BearerToken> {
    let request = token_request(config, resource)?;
    let response: TokenResponse = http.send_json(SERVICE, request).await?;

    let Some(token) = response.access_token.filter(|t| !t.is_empty()) else {
        return Err(SyncError::MissingField {
            service: SERVICE,
            field: "access_token",
        });
    };

    debug!("Acquired managed identity token for {}", resource);
    Ok(BearerToken::new(token))
}

fn token_request(config: &SyncConfig, resource: &str) -> Result<Request<Bytes>> {
    let (mut url, api_version, header_name, mut header_value) = match &config.identity_endpoint {
        IdentityEndpoint::AppService { endpoint, header } => (
            endpoint.clone(),
            azure::APP_SERVICE_API_VERSION,
            azure::IDENTITY_HEADER_NAME,
            HeaderValue::from_str(header)?,
        ),
        IdentityEndpoint::Imds => (
            Url::parse(azure::IMDS_TOKEN_ENDPOINT)
                .map_err(|e| SyncError::InvalidUrl(e.to_string()))?,
            azure::IMDS_API_VERSION,
            azure::METADATA_HEADER_NAME,
            HeaderValue::from_static("true"),
        ),
    };
    header_value.set_sensitive(true);

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("api-version", api_version)
            .append_pair("resource", resource);
        if let Some(client_id) = &config.managed_identity_client_id {
            query.append_pair("client_id", client_id);
        }
    }

    Ok(Request::builder()
        .method(Method::GET)
        .uri(url.as_str())
        .header(header_name, header_value)
        .header(header::ACCEPT, "application/json")
        .body(Bytes::new())?)
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! OAuth2 client-credentials grant against the DSM token endpoint

use crate::constants::dsm;
use crate::error::{Result, SyncError};
use crate::transport::{join_segments, HttpClient};
use crate::types::BearerToken;
use bytes::Bytes;
use http::{header, Method, Request};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::{form_urlencoded, Url};

const SERVICE: &str = "DSM token endpoint";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Exchange the client id and secret for a bearer token
#[instrument(skip(http, base_url, client_secret), fields(base_url = %base_url))]
pub async fn request_token(
    http: &HttpClient,
    base_url: &Url,
    client_id: &str,
    client_secret: &str,
) -> Result<BearerToken> {
    let url = join_segments(base_url, &dsm::TOKEN_PATH)?;

    let form = form_urlencoded::Serializer::new(String::new())
        .append_pair("grant_type", "client_credentials")
        .append_pair("client_id", client_id)
        .append_pair("client_secret", client_secret)
        .finish();

    let request = Request::builder()
        .method(Method::POST)
        .uri(url.as_str())
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::ACCEPT, "application/json")
        .body(Bytes::from(form))?;

    let response: TokenResponse = http.send_json(SERVICE, request).await?;

    let Some(token) = response.access_token.filter(|t| !t.is_empty()) else {
        return Err(SyncError::MissingField {
            service: SERVICE,
            field: "access_token",
        });
    };

    debug!("Obtained DSM access token");
    Ok(BearerToken::new(token))
}

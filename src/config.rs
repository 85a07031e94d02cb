// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{dsm, env as vars, server};
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("{var} is not a valid URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },

    #[error("{var} is not a valid number: {value}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Managed identity token source for the Key Vault read
#[derive(Clone, PartialEq, Eq)]
pub enum IdentityEndpoint {
    /// App Service / Functions identity endpoint, authenticated by a per-instance header
    AppService { endpoint: Url, header: String },
    /// Azure Instance Metadata Service
    Imds,
}

impl fmt::Debug for IdentityEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityEndpoint::AppService { endpoint, .. } => f
                .debug_struct("AppService")
                .field("endpoint", &endpoint.as_str())
                .finish_non_exhaustive(),
            IdentityEndpoint::Imds => f.write_str("Imds"),
        }
    }
}

/// Per-invocation configuration, resolved from environment variables
#[derive(Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Key Vault base URL, e.g. https://myvault.vault.azure.net
    pub vault_url: Url,
    pub dsm_base_url: Url,
    pub client_id: String,
    pub client_secret: String,
    /// `identity` field sent with every upserted secret
    pub secret_identity: String,
    pub secret_description: String,
    pub identity_endpoint: IdentityEndpoint,
    /// Set when a user-assigned managed identity should be used
    pub managed_identity_client_id: Option<String>,
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("vault_url", &self.vault_url.as_str())
            .field("dsm_base_url", &self.dsm_base_url.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("secret_identity", &self.secret_identity)
            .field("secret_description", &self.secret_description)
            .field("identity_endpoint", &self.identity_endpoint)
            .field("managed_identity_client_id", &self.managed_identity_client_id)
            .finish()
    }
}

impl SyncConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vault_url = parse_url(vars::KEY_VAULT_URL, &required(&lookup, vars::KEY_VAULT_URL)?)?;
        let dsm_base_url = parse_url(vars::DSM_BASE_URL, &required(&lookup, vars::DSM_BASE_URL)?)?;
        let client_id = required(&lookup, vars::DSM_CLIENT_ID)?;
        let client_secret = required(&lookup, vars::DSM_CLIENT_SECRET)?;

        let secret_identity =
            non_empty(&lookup, vars::DSM_SECRET_IDENTITY).unwrap_or_else(|| client_id.clone());
        let secret_description = non_empty(&lookup, vars::DSM_SECRET_DESCRIPTION)
            .unwrap_or_else(|| dsm::DEFAULT_DESCRIPTION.to_string());

        let identity_endpoint = match non_empty(&lookup, vars::IDENTITY_ENDPOINT) {
            Some(endpoint) => IdentityEndpoint::AppService {
                endpoint: parse_url(vars::IDENTITY_ENDPOINT, &endpoint)?,
                header: required(&lookup, vars::IDENTITY_HEADER)?,
            },
            None => IdentityEndpoint::Imds,
        };

        Ok(SyncConfig {
            vault_url,
            dsm_base_url,
            client_id,
            client_secret,
            secret_identity,
            secret_description,
            identity_endpoint,
            managed_identity_client_id: non_empty(&lookup, vars::AZURE_CLIENT_ID),
        })
    }
}

/// Process-wide listener configuration, read once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Custom handler route; the Functions host posts invocations to `/{function_name}`
    pub function_name: String,
    /// Name of the Event Grid trigger binding inside the invocation payload
    pub event_binding: String,
    pub http_timeout: Duration,
    pub json_logs: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match non_empty(&lookup, vars::LISTEN_PORT) {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                var: vars::LISTEN_PORT,
                value,
            })?,
            None => server::DEFAULT_PORT,
        };

        let timeout_secs = match non_empty(&lookup, vars::HTTP_TIMEOUT_SECS) {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                var: vars::HTTP_TIMEOUT_SECS,
                value,
            })?,
            None => server::DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(ServerConfig {
            port,
            function_name: non_empty(&lookup, vars::FUNCTION_NAME)
                .unwrap_or_else(|| server::DEFAULT_FUNCTION_NAME.to_string()),
            event_binding: non_empty(&lookup, vars::EVENT_BINDING)
                .unwrap_or_else(|| server::DEFAULT_EVENT_BINDING.to_string()),
            http_timeout: Duration::from_secs(timeout_secs),
            json_logs: non_empty(&lookup, vars::LOG_FORMAT)
                .is_some_and(|v| v.eq_ignore_ascii_case("json")),
        })
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    non_empty(lookup, key).ok_or(ConfigError::Missing(key))
}

fn parse_url(var: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        var,
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            var,
            reason: format!("unsupported URL '{}'", value),
        });
    }

    Ok(url)
}

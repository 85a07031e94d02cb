// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Relays a changed Key Vault secret to DSM.

use crate::azure;
use crate::config::{ConfigError, SyncConfig};
use crate::constants::azure::KEY_VAULT_RESOURCE;
use crate::dsm;
use crate::error::Result;
use crate::sync::payload::TargetSecretPayload;
use crate::transport::HttpClient;
use crate::types::ChangeNotification;
use std::env;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Result of a handled invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The secret was pushed to DSM
    Synced { name: String },
    /// Input or configuration was absent; nothing was sent anywhere
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingObjectName,
    Configuration(ConfigError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingObjectName => f.write_str("notification carries no object name"),
            SkipReason::Configuration(e) => write!(f, "configuration incomplete: {}", e),
        }
    }
}

/// Handles one change notification at a time; holds no state between calls
/// apart from the shared HTTP transport.
#[derive(Clone)]
pub struct SecretSyncHandler {
    http: HttpClient,
    env: EnvLookup,
}

impl SecretSyncHandler {
    /// Handler reading its configuration from the process environment
    pub fn new(http: HttpClient) -> Self {
        Self::with_env(http, |key| env::var(key).ok())
    }

    /// Handler reading its configuration through `lookup`
    pub fn with_env<F>(http: HttpClient, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            http,
            env: Arc::new(lookup),
        }
    }

    /// Handle a single change notification.
    ///
    /// A missing object name or missing configuration is reported as
    /// [`SyncOutcome::Skipped`] without touching the network. Any downstream
    /// failure is returned as an error.
    #[instrument(
        skip(self, notification),
        fields(event_id = ?notification.id, event_type = notification.event_type())
    )]
    pub async fn handle(&self, notification: &ChangeNotification) -> Result<SyncOutcome> {
        let Some(name) = notification.object_name() else {
            warn!("Notification has no object name, skipping");
            return Ok(SyncOutcome::Skipped(SkipReason::MissingObjectName));
        };

        let config = match SyncConfig::from_lookup(|key| (self.env)(key)) {
            Ok(c) => c,
            Err(e) => {
                warn!("Cannot sync secret {}: {}", name, e);
                return Ok(SyncOutcome::Skipped(SkipReason::Configuration(e)));
            }
        };

        if let Some(object_type) = notification.object_type() {
            info!(
                version = notification.version().unwrap_or_default(),
                "Received change for {} {} in vault {}",
                object_type,
                name,
                notification.vault_name().unwrap_or("<unknown>")
            );
        }

        match self.sync_secret(name, &config).await {
            Ok(()) => {
                info!("Secret {} synced to DSM", name);
                Ok(SyncOutcome::Synced {
                    name: name.to_string(),
                })
            }
            Err(e) => {
                error!("Failed to sync secret {}: {}", name, e);
                Err(e)
            }
        }
    }

    async fn sync_secret(&self, name: &str, config: &SyncConfig) -> Result<()> {
        let vault_token = azure::acquire_token(&self.http, config, KEY_VAULT_RESOURCE).await?;
        let value = azure::get_secret(&self.http, &config.vault_url, &vault_token, name).await?;

        let dsm_token = dsm::request_token(
            &self.http,
            &config.dsm_base_url,
            &config.client_id,
            &config.client_secret,
        )
        .await?;

        let payload = TargetSecretPayload::new(
            config.secret_identity.as_str(),
            name,
            config.secret_description.as_str(),
            &value,
        )?;

        dsm::upsert_secret(&self.http, &config.dsm_base_url, &dsm_token, &payload).await
    }
}

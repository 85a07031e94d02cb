// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Environment variables read by the relay
pub mod env {
    pub const KEY_VAULT_URL: &str = "KEY_VAULT_URL";
    pub const DSM_BASE_URL: &str = "DSM_BASE_URL";
    pub const DSM_CLIENT_ID: &str = "DSM_CLIENT_ID";
    pub const DSM_CLIENT_SECRET: &str = "DSM_CLIENT_SECRET";
    /// Overrides the `identity` field of the upserted secret (defaults to the client id)
    pub const DSM_SECRET_IDENTITY: &str = "DSM_SECRET_IDENTITY";
    pub const DSM_SECRET_DESCRIPTION: &str = "DSM_SECRET_DESCRIPTION";
    /// Client id of a user-assigned managed identity
    pub const AZURE_CLIENT_ID: &str = "AZURE_CLIENT_ID";
    pub const IDENTITY_ENDPOINT: &str = "IDENTITY_ENDPOINT";
    pub const IDENTITY_HEADER: &str = "IDENTITY_HEADER";
    pub const HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
    /// Port the Functions host forwards invocations to
    pub const LISTEN_PORT: &str = "FUNCTIONS_CUSTOMHANDLER_PORT";
    pub const FUNCTION_NAME: &str = "SYNC_FUNCTION_NAME";
    pub const EVENT_BINDING: &str = "SYNC_EVENT_BINDING";
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
}

/// Azure managed identity and Key Vault
pub mod azure {
    /// Resource audience requested for Key Vault tokens
    pub const KEY_VAULT_RESOURCE: &str = "https://vault.azure.net";
    pub const KEY_VAULT_API_VERSION: &str = "7.4";
    /// Token endpoint used when the App Service identity variables are absent
    pub const IMDS_TOKEN_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";
    pub const IMDS_API_VERSION: &str = "2018-02-01";
    pub const APP_SERVICE_API_VERSION: &str = "2019-08-01";
    pub const IDENTITY_HEADER_NAME: &str = "x-identity-header";
    pub const METADATA_HEADER_NAME: &str = "metadata";
}

/// DSM API paths and payload constants
pub mod dsm {
    pub const TOKEN_PATH: [&str; 3] = ["iso", "oauth2", "token"];
    pub const SECRET_PATH: [&str; 3] = ["iso", "sctm", "secret"];
    pub const ENGINE: &str = "Generic";
    pub const DEFAULT_DESCRIPTION: &str = "Synchronized from Azure Key Vault";
}

/// Event Grid event types handled specially by the webhook endpoint
pub mod events {
    pub const SUBSCRIPTION_VALIDATION: &str = "Microsoft.EventGrid.SubscriptionValidationEvent";
}

/// Listener defaults
pub mod server {
    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_FUNCTION_NAME: &str = "secret_sync";
    pub const DEFAULT_EVENT_BINDING: &str = "event";
    pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
    pub const WEBHOOK_PATH: &str = "/api/events";
    pub const HEALTH_PATH: &str = "/healthz";
    /// Upper bound on inbound request bodies
    pub const MAX_BODY_BYTES: usize = 1024 * 1024;
}

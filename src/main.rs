// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vault_relay::config::{ServerConfig, SyncConfig};
use vault_relay::server::{Router, Server};
use vault_relay::sync::SecretSyncHandler;
use vault_relay::transport::HttpClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load listener configuration
    let config = ServerConfig::from_env().context("Invalid listener configuration")?;

    // Initialize tracing
    init_tracing(config.json_logs);

    info!("Starting vault-relay");
    info!(
        "Configuration loaded: port={}, function={}, binding={}",
        config.port, config.function_name, config.event_binding
    );

    // Sync configuration is resolved per invocation; surface problems early anyway
    if let Err(e) = SyncConfig::from_env() {
        warn!("Sync configuration incomplete, invocations will be skipped: {}", e);
    }

    let http = HttpClient::with_timeout(config.http_timeout)?;
    let handler = SecretSyncHandler::new(http);
    let router = Router::new(handler, &config.function_name, &config.event_binding);
    let server = Server::new(SocketAddr::from(([0, 0, 0, 0], config.port)), router);

    tokio::select! {
        result = server.serve() => result?,
        _ = tokio::signal::ctrl_c() => info!("Received shutdown signal, stopping"),
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use leafscan_client::{ClientConfig, LeafscanClient, ToolAdapter};
use leafscan_core::modules::config::{load_config, require_api_key};
use leafscan_core::{Capabilities, DiagnosisPipeline};

use crate::cli::ConfigCommands;
use crate::config_commands;
use crate::mcp;
use crate::router::build_router;
use crate::state::AppState;

pub async fn serve(config_path: Option<&Path>, port: Option<u16>) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }
    require_api_key(&config)?;

    let capabilities = Capabilities::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Failed to build capabilities: {}", e))?;
    let state = AppState::new(DiagnosisPipeline::new(capabilities), &config);
    info!(
        audio_dir = %config.server.audio_dir,
        model = %config.generator.model,
        "Application state initialized"
    );

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.server.host, config.server.port))?;

    info!("LeafScan server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("Server stopped");
    Ok(())
}

pub async fn serve_mcp(config_path: Option<&Path>, backend_url: Option<String>) -> Result<()> {
    let config = load_config(config_path)?;
    let mut client_config = ClientConfig::from(&config.tools);
    if let Some(url) = backend_url {
        client_config.base_url = url;
    }
    info!(backend = %client_config.base_url, "Starting stdio tool server");

    let adapter = ToolAdapter::new(Arc::new(LeafscanClient::new(client_config)?)).with_image_limits(
        config.server.max_upload_bytes as u64,
        Duration::from_secs(config.tools.analyze_timeout_secs),
    );
    mcp::serve_stdio(adapter).await
}

pub fn handle_config_command(cmd: ConfigCommands, config_path: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Show { json } => config_commands::show_config(config_path, json),
        ConfigCommands::Init { force } => config_commands::init_config(config_path, force),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

//! LeafScan Server
//!
//! Plant leaf disease diagnosis daemon:
//! - `POST /analyze` runs classify -> explain -> speak over an uploaded leaf
//! - `GET /plant_info/{plant}`, `GET /audio/{file}`, `GET /health`
//! - `POST /mcp` and `leafscan-server mcp` expose the same work as tools
//!
//! Access via: http://localhost:8000

use anyhow::Result;
use clap::Parser;

mod api;
mod check;
mod cli;
mod commands;
mod config_commands;
mod in_process;
mod mcp;
mod router;
mod state;

#[cfg(test)]
mod test_helpers;

use cli::{Cli, Commands};
use leafscan_core::modules::config::load_config;
use leafscan_core::modules::logger::{init_logging, LogTarget};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Stdout carries protocol frames in stdio tool mode
    let target = if cli.uses_stdio_transport() { LogTarget::Stderr } else { LogTarget::Stdout };
    init_logging(&cli.log_level, target).map_err(|e| anyhow::anyhow!(e))?;

    let config_path = cli.config.as_deref();
    match cli.command {
        None | Some(Commands::Serve) => commands::serve(config_path, cli.port).await,
        Some(Commands::Mcp { backend_url }) => commands::serve_mcp(config_path, backend_url).await,
        Some(Commands::Check { plant, image, backend_url }) => {
            let config = load_config(config_path)?;
            check::run_check(&config.tools, backend_url, &plant, image.as_deref()).await
        }
        Some(Commands::Config(cmd)) => commands::handle_config_command(cmd, config_path),
    }
}

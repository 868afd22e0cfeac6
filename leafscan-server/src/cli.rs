use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "leafscan-server",
    about = "LeafScan - plant leaf disease diagnosis service",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, env = "LEAFSCAN_CONFIG", help = "Path to leafscan.json")]
    pub config: Option<PathBuf>,

    #[arg(short, long, env = "LEAFSCAN_PORT", help = "Override server.port")]
    pub port: Option<u16>,

    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Whether stdout is reserved for protocol traffic.
    pub fn uses_stdio_transport(&self) -> bool {
        matches!(self.command, Some(Commands::Mcp { .. }))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the HTTP server (default if no command specified)")]
    Serve,

    #[command(about = "Serve the diagnosis tools as JSON-RPC over stdin/stdout")]
    Mcp {
        #[arg(long, env = "LEAFSCAN_BACKEND_URL", help = "Backend base URL (overrides tools.backend_url)")]
        backend_url: Option<String>,
    },

    #[command(about = "Smoke-test a running backend through the diagnosis tools")]
    Check {
        #[arg(long, default_value = "potato", help = "Plant type to analyze")]
        plant: String,

        #[arg(help = "Leaf image to upload; analysis and audio steps are skipped without one")]
        image: Option<PathBuf>,

        #[arg(long, env = "LEAFSCAN_BACKEND_URL", help = "Backend base URL (overrides tools.backend_url)")]
        backend_url: Option<String>,
    },

    #[command(subcommand, about = "View and initialize configuration")]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show current configuration")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Write a default configuration file")]
    Init {
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },
}

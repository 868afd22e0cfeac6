//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Where formatted log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    /// Keeps stdout free for protocol traffic
    Stderr,
}

/// `RUST_LOG` when set, otherwise `default_level` (e.g. `info`).
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber. Call once per process.
pub fn init_logging(default_level: &str, target: LogTarget) -> Result<(), String> {
    let filter = env_filter(default_level);
    let result = match target {
        LogTarget::Stdout => tracing::subscriber::set_global_default(
            FmtSubscriber::builder().with_env_filter(filter).finish(),
        ),
        LogTarget::Stderr => tracing::subscriber::set_global_default(
            FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .finish(),
        ),
    };
    result.map_err(|e| format!("Failed to install tracing subscriber: {}", e))
}

//! HTTP server configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Direct transport settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    #[validate(length(min = 1_u64))]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    #[validate(range(min = 1_u16))]
    pub port: u16,
    /// Directory synthesized audio is written to and served from
    #[serde(default = "default_audio_dir")]
    #[validate(length(min = 1_u64))]
    pub audio_dir: String,
    /// Deadline for one `/analyze` chain
    #[serde(default = "default_request_timeout")]
    #[validate(range(min = 1_u64, max = 3600_u64))]
    pub request_timeout_secs: u64,
    /// Largest accepted upload
    #[serde(default = "default_max_upload_bytes")]
    #[validate(range(min = 1024_usize))]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            audio_dir: default_audio_dir(),
            request_timeout_secs: default_request_timeout(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8000
}

fn default_audio_dir() -> String {
    "audio".to_string()
}

const fn default_request_timeout() -> u64 {
    120
}

const fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

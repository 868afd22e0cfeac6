//! Tool adapter configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Where the tool adapter sends its remote calls, and how long each may take.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct ToolsConfig {
    /// Backend base URL used by the stdio tool server and `check`
    #[serde(default = "default_backend_url")]
    #[validate(url)]
    pub backend_url: String,
    #[serde(default = "default_health_timeout")]
    #[validate(range(min = 1_u64))]
    pub health_timeout_secs: u64,
    #[serde(default = "default_analyze_timeout")]
    #[validate(range(min = 1_u64))]
    pub analyze_timeout_secs: u64,
    #[serde(default = "default_audio_timeout")]
    #[validate(range(min = 1_u64))]
    pub audio_timeout_secs: u64,
    #[serde(default = "default_plant_info_timeout")]
    #[validate(range(min = 1_u64))]
    pub plant_info_timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            health_timeout_secs: default_health_timeout(),
            analyze_timeout_secs: default_analyze_timeout(),
            audio_timeout_secs: default_audio_timeout(),
            plant_info_timeout_secs: default_plant_info_timeout(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

const fn default_health_timeout() -> u64 {
    5
}

const fn default_analyze_timeout() -> u64 {
    30
}

const fn default_audio_timeout() -> u64 {
    30
}

const fn default_plant_info_timeout() -> u64 {
    10
}

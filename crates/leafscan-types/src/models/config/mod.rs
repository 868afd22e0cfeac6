//! Service configuration model.
//!
//! Every section has defaults so a partial JSON file (or none at all) still
//! yields a complete configuration.

mod capabilities;
mod server;
mod tools;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use capabilities::{ClassifierConfig, GeneratorConfig, ModelEndpoints, SpeechConfig};
pub use server::ServerConfig;
pub use tools::ToolsConfig;

/// Full LeafScan configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Validate)]
pub struct LeafscanConfig {
    /// HTTP server settings
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,
    /// Plant classification models
    #[serde(default)]
    #[validate(nested)]
    pub classifier: ClassifierConfig,
    /// Generative text backend
    #[serde(default)]
    #[validate(nested)]
    pub generator: GeneratorConfig,
    /// Speech backend
    #[serde(default)]
    #[validate(nested)]
    pub speech: SpeechConfig,
    /// Tool adapter settings
    #[serde(default)]
    #[validate(nested)]
    pub tools: ToolsConfig,
}

use std::time::Duration;

use leafscan_client::ToolAdapter;
use leafscan_core::{AudioStore, DiagnosisPipeline};
use leafscan_types::models::config::ServerConfig;

use super::AppState;

impl AppState {
    pub fn pipeline(&self) -> &DiagnosisPipeline {
        &self.inner.pipeline
    }

    pub fn audio_store(&self) -> &AudioStore {
        self.inner.pipeline.audio_store()
    }

    pub fn server_config(&self) -> &ServerConfig {
        &self.inner.server
    }

    pub fn tools(&self) -> &ToolAdapter {
        &self.inner.tools
    }

    /// Deadline for one `/analyze` chain.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.inner.server.request_timeout_secs)
    }
}

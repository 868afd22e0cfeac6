//! Application State
//!
//! Holds the diagnosis pipeline and the tool adapter shared by every handler.

mod accessors;

use std::sync::Arc;
use std::time::Duration;

use leafscan_client::ToolAdapter;
use leafscan_core::DiagnosisPipeline;
use leafscan_types::models::config::ServerConfig;
use leafscan_types::LeafscanConfig;

use crate::in_process::InProcessBackend;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub(crate) inner: Arc<AppStateInner>,
}

pub struct AppStateInner {
    pub pipeline: DiagnosisPipeline,
    pub server: ServerConfig,
    /// Tool adapter over the in-process backend, served at `/mcp`
    pub tools: ToolAdapter,
}

impl AppState {
    pub fn new(pipeline: DiagnosisPipeline, config: &LeafscanConfig) -> Self {
        let backend = InProcessBackend::new(pipeline.clone(), &config.tools);
        Self {
            inner: Arc::new(AppStateInner {
                pipeline,
                server: config.server.clone(),
                tools: ToolAdapter::new(Arc::new(backend)).with_image_limits(
                    config.server.max_upload_bytes as u64,
                    Duration::from_secs(config.tools.analyze_timeout_secs),
                ),
            }),
        }
    }
}

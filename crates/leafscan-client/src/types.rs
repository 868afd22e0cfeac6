//! Client configuration and response types.

use std::time::Duration;

use bytes::Bytes;
use serde_json::Value;

use leafscan_types::models::config::ToolsConfig;

/// Base URL plus the per-operation time budgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub health_timeout: Duration,
    pub analyze_timeout: Duration,
    pub audio_timeout: Duration,
    pub plant_info_timeout: Duration,
}

impl ClientConfig {
    /// Default budgets (5/30/30/10 s) against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let defaults = ToolsConfig::default();
        Self { base_url: base_url.into(), ..Self::from(&defaults) }
    }
}

impl From<&ToolsConfig> for ClientConfig {
    fn from(config: &ToolsConfig) -> Self {
        Self {
            base_url: config.backend_url.clone(),
            health_timeout: Duration::from_secs(config.health_timeout_secs),
            analyze_timeout: Duration::from_secs(config.analyze_timeout_secs),
            audio_timeout: Duration::from_secs(config.audio_timeout_secs),
            plant_info_timeout: Duration::from_secs(config.plant_info_timeout_secs),
        }
    }
}

/// A complete backend answer, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl BackendResponse {
    pub fn new(status: u16, content_type: Option<String>, body: impl Into<Bytes>) -> Self {
        Self { status, content_type, body: body.into() }
    }

    /// JSON response with a serialized body.
    pub fn json(status: u16, value: &Value) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        Self::new(status, Some("application/json".to_string()), body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.split(';').next().is_some_and(|m| m.trim() == "application/json"))
    }

    /// Body decoded as JSON, if it is JSON.
    pub fn json_body(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Body as (lossy) UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

//! Tool transport envelopes.
//!
//! Every tool operation returns either its success payload or an
//! [`ErrorEnvelope`]. The `error` key only ever appears on the envelope, which
//! is how callers tell the two apart.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Failure classes reported by tool operations. Serialized as the fixed
/// human-readable strings tool callers match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "Invalid plant type")]
    InvalidPlantType,
    #[serde(rename = "File not found")]
    FileNotFound,
    /// Non-2xx from the backend's analyze endpoint
    #[serde(rename = "FastAPI error")]
    BackendStatus,
    #[serde(rename = "Request timed out")]
    Timeout,
    #[serde(rename = "Connection failed")]
    ConnectionFailed,
    #[serde(rename = "Failed to download audio")]
    AudioDownload,
    /// 404 on an optional endpoint
    #[serde(rename = "Endpoint not implemented")]
    EndpointNotImplemented,
    /// Non-2xx (other than 404) on an optional endpoint
    #[serde(rename = "API error")]
    ApiError,
    #[serde(rename = "Unexpected error")]
    Unexpected,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidPlantType => "Invalid plant type",
            ErrorKind::FileNotFound => "File not found",
            ErrorKind::BackendStatus => "FastAPI error",
            ErrorKind::Timeout => "Request timed out",
            ErrorKind::ConnectionFailed => "Connection failed",
            ErrorKind::AudioDownload => "Failed to download audio",
            ErrorKind::EndpointNotImplemented => "Endpoint not implemented",
            ErrorKind::ApiError => "API error",
            ErrorKind::Unexpected => "Unexpected error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform failure shape of every tool operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_plants: Option<Vec<String>>,
}

impl ErrorEnvelope {
    pub fn new(error: ErrorKind) -> Self {
        Self { error, details: None, status_code: None, supported_plants: None }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_supported_plants(mut self, plants: Vec<String>) -> Self {
        self.supported_plants = Some(plants);
        self
    }

    /// Serialize into the JSON value handed to tool callers.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            serde_json::json!({ "error": self.error.as_str() })
        })
    }

    /// Recognize an envelope in an arbitrary tool result.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.get("error")?;
        serde_json::from_value(value.clone()).ok()
    }
}

/// Audio container formats `play_audio` reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
    Ogg,
}

impl AudioFormat {
    /// Classify from a locator's suffix; anything unrecognized is mp3.
    pub fn from_locator(locator: &str) -> Self {
        let lower = locator.to_ascii_lowercase();
        if lower.ends_with(".wav") {
            AudioFormat::Wav
        } else if lower.ends_with(".ogg") {
            AudioFormat::Ogg
        } else {
            AudioFormat::Mp3
        }
    }
}

/// Success payload of `play_audio`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioPayload {
    pub success: bool,
    /// Base64 (standard alphabet, padded)
    pub audio_data: String,
    pub format: AudioFormat,
    pub size_bytes: usize,
}

/// Reachability classes reported by `health_check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Unreachable,
    Error,
}

/// Result of `health_check`. Never an [`ErrorEnvelope`]: an unreachable
/// backend is a status, not a failure of the probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HealthReport {
    pub fn healthy(backend_url: impl Into<String>, response: Value) -> Self {
        Self {
            status: HealthStatus::Healthy,
            backend_url: Some(backend_url.into()),
            response: Some(response),
            status_code: None,
            details: None,
        }
    }

    pub fn unhealthy(status_code: u16, details: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            backend_url: None,
            response: None,
            status_code: Some(status_code),
            details: Some(details.into()),
        }
    }

    pub fn with_status(status: HealthStatus, details: impl Into<String>) -> Self {
        Self {
            status,
            backend_url: None,
            response: None,
            status_code: None,
            details: Some(details.into()),
        }
    }
}

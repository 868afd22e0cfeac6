//! Typed error definitions for LeafScan.
//!
//! [`DiagnosisError`] is the request-level taxonomy shared by the pipeline and
//! both transports. Every variant maps to one HTTP status, so the direct
//! transport and the in-process tool backend report failures identically.

mod config;

pub use config::ConfigError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::PlantType;

/// Errors that can fail (part of) a diagnosis request.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum DiagnosisError {
    /// Plant outside the closed enumeration; no compute performed
    #[error("Invalid plant type '{plant}'. Use potato/pepper/tomato.")]
    InvalidPlantType { plant: String },

    /// Request carried no image bytes
    #[error("Missing image file")]
    MissingImage,

    /// Image bytes could not be decoded
    #[error("Could not decode image: {message}")]
    ImageDecode { message: String },

    /// Model returned something that is not a probability vector for the plant
    #[error("Inference failed: {message}")]
    Inference { message: String },

    /// External capability did not answer in time
    #[error("{service} timed out")]
    UpstreamTimeout { service: String },

    /// External capability could not be reached
    #[error("{service} unreachable: {message}")]
    UpstreamUnreachable { service: String, message: String },

    /// External capability answered with an error or an unusable body
    #[error("{service} returned HTTP {status}: {message}")]
    UpstreamStatus { service: String, status: u16, message: String },

    /// Synthesized audio could not be persisted
    #[error("Failed to write audio: {message}")]
    AudioWrite { message: String },
}

impl DiagnosisError {
    /// Build the invalid-plant error for a raw caller-supplied name.
    pub fn invalid_plant(plant: impl Into<String>) -> Self {
        Self::InvalidPlantType { plant: plant.into() }
    }

    /// Whether the caller (not an upstream or the server) is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidPlantType { .. } | Self::MissingImage | Self::ImageDecode { .. })
    }

    /// Whether an external capability caused the failure.
    pub fn is_upstream_error(&self) -> bool {
        matches!(
            self,
            Self::UpstreamTimeout { .. }
                | Self::UpstreamUnreachable { .. }
                | Self::UpstreamStatus { .. }
                | Self::Inference { .. }
        )
    }

    /// HTTP status code for the direct transport.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidPlantType { .. } | Self::MissingImage => 400,
            Self::ImageDecode { .. } => 422,
            Self::Inference { .. } | Self::UpstreamUnreachable { .. } | Self::UpstreamStatus { .. } => {
                502
            }
            Self::UpstreamTimeout { .. } => 504,
            Self::AudioWrite { .. } => 500,
        }
    }

    /// Supported plant names, attached to invalid-plant reports.
    pub fn supported_plants() -> Vec<String> {
        PlantType::supported_names()
    }
}

/// Standard Result type using DiagnosisError.
pub type Result<T> = std::result::Result<T, DiagnosisError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = DiagnosisError::invalid_plant("banana");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("InvalidPlantType"));
        assert!(json.contains("banana"));

        let deserialized: DiagnosisError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, deserialized);
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(DiagnosisError::invalid_plant("x").http_status_code(), 400);
        assert_eq!(DiagnosisError::MissingImage.http_status_code(), 400);
        assert_eq!(
            DiagnosisError::UpstreamTimeout { service: "classifier".to_string() }
                .http_status_code(),
            504
        );
        assert_eq!(
            DiagnosisError::AudioWrite { message: "disk full".to_string() }.http_status_code(),
            500
        );
    }

    #[test]
    fn test_error_display() {
        let err = DiagnosisError::UpstreamStatus {
            service: "speech".to_string(),
            status: 503,
            message: "busy".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("speech"));
        assert!(msg.contains("503"));
        assert!(err.is_upstream_error());
        assert!(!err.is_client_error());
    }
}

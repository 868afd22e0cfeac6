//! Diagnosis documents produced by one pipeline run.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::plant::PlantType;

/// MIME type of every synthesized audio asset.
pub const AUDIO_MIME: &str = "audio/mpeg";

/// Locator prefix under which audio assets are served.
pub const AUDIO_ROUTE_PREFIX: &str = "/audio/";

/// Outcome of the classification step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub plant: PlantType,
    /// Always a member of `plant.vocabulary()`.
    pub label: String,
    /// Probability of `label`, in `[0, 1]`.
    pub confidence: f64,
}

/// A document the text generator is asked to emit as a single JSON object.
///
/// `REQUIRED_KEYS` lists the keys that must all be present for a repaired
/// object to count as a valid document.
pub trait StructuredDocument: Serialize + DeserializeOwned {
    const REQUIRED_KEYS: &'static [&'static str];
}

/// Disease explanation returned by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationDocument {
    pub disease_overview: String,
    pub symptoms: String,
    pub cause: String,
    pub recommended_treatment: String,
    pub prevention_tips: String,
}

impl StructuredDocument for ExplanationDocument {
    const REQUIRED_KEYS: &'static [&'static str] =
        &["disease_overview", "symptoms", "cause", "recommended_treatment", "prevention_tips"];
}

/// General crop information returned by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantInfoDocument {
    pub plant_info: String,
    pub common_diseases: String,
}

impl StructuredDocument for PlantInfoDocument {
    const REQUIRED_KEYS: &'static [&'static str] = &["plant_info", "common_diseases"];
}

/// Recovery value used when a generated document cannot be reconstructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackEnvelope {
    pub error: String,
    /// Upstream text, verbatim.
    pub raw: String,
}

impl FallbackEnvelope {
    pub const INVALID_JSON: &'static str = "Invalid JSON";
    pub const GENERATION_FAILED: &'static str = "Generation failed";

    /// Generated text could not be parsed into the expected document.
    pub fn invalid_json(raw: impl Into<String>) -> Self {
        Self { error: Self::INVALID_JSON.to_string(), raw: raw.into() }
    }

    /// The generator call itself failed; `detail` describes the failure.
    pub fn generation_failed(detail: impl Into<String>) -> Self {
        Self { error: Self::GENERATION_FAILED.to_string(), raw: detail.into() }
    }
}

/// Either a valid document or its fallback envelope.
///
/// Serialized untagged; the variants are told apart by the `error` key, which
/// only the fallback carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Generated<T> {
    Fallback(FallbackEnvelope),
    Document(T),
}

impl<T> Generated<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Generated::Fallback(_))
    }

    pub fn document(&self) -> Option<&T> {
        match self {
            Generated::Document(doc) => Some(doc),
            Generated::Fallback(_) => None,
        }
    }

    pub fn fallback(&self) -> Option<&FallbackEnvelope> {
        match self {
            Generated::Fallback(envelope) => Some(envelope),
            Generated::Document(_) => None,
        }
    }
}

impl Generated<ExplanationDocument> {
    /// Treatment text, absent when the explanation fell back.
    pub fn recommended_treatment(&self) -> Option<&str> {
        self.document().map(|doc| doc.recommended_treatment.as_str())
    }
}

/// A persisted speech asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioAsset {
    /// `/audio/<unique-name>.mp3`
    pub locator: String,
    pub mime: String,
}

impl AudioAsset {
    pub fn from_file_name(file_name: &str) -> Self {
        Self { locator: format!("{AUDIO_ROUTE_PREFIX}{file_name}"), mime: AUDIO_MIME.to_string() }
    }

    /// File name part of the locator.
    pub fn file_name(&self) -> &str {
        self.locator.strip_prefix(AUDIO_ROUTE_PREFIX).unwrap_or(&self.locator)
    }
}

/// Terminal artifact of one diagnosis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResponse {
    pub plant: PlantType,
    pub predicted_disease: String,
    pub confidence: f64,
    pub explanation: Generated<ExplanationDocument>,
    pub audio_url: String,
}

/// Body of `GET /plant_info/{plant}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantInfoResponse {
    pub info: Generated<PlantInfoDocument>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self { status: "healthy".to_string(), message: "LeafScan server is running".to_string() }
    }
}

/// Progress of a single diagnosis request.
///
/// `Received -> Classified -> {ExplanationReady | ExplanationFallback}
/// -> AudioSynthesized -> Completed`; `Rejected` is only reachable from
/// `Received`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisStage {
    Received,
    Classified,
    ExplanationReady,
    ExplanationFallback,
    AudioSynthesized,
    Completed,
    Rejected,
}

impl fmt::Display for DiagnosisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosisStage::Received => "received",
            DiagnosisStage::Classified => "classified",
            DiagnosisStage::ExplanationReady => "explanation_ready",
            DiagnosisStage::ExplanationFallback => "explanation_fallback",
            DiagnosisStage::AudioSynthesized => "audio_synthesized",
            DiagnosisStage::Completed => "completed",
            DiagnosisStage::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

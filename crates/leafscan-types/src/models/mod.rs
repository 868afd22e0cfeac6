//! Domain models.

pub mod config;
mod diagnosis;
mod plant;

pub use config::LeafscanConfig;
pub use diagnosis::{
    AudioAsset, ClassificationResult, DiagnosisResponse, DiagnosisStage, ExplanationDocument,
    FallbackEnvelope, Generated, HealthResponse, PlantInfoDocument, PlantInfoResponse,
    StructuredDocument, AUDIO_MIME, AUDIO_ROUTE_PREFIX,
};
pub use plant::{is_healthy_label, PlantType, HEALTHY_LABEL};

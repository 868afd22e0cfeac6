//! Result Assembler.

use leafscan_types::{
    AudioAsset, ClassificationResult, DiagnosisResponse, ExplanationDocument, Generated,
};

/// Combine the stage outputs into the response. Fallback explanations are
/// embedded as they are.
pub fn assemble(
    classification: ClassificationResult,
    explanation: Generated<ExplanationDocument>,
    audio: AudioAsset,
) -> DiagnosisResponse {
    DiagnosisResponse {
        plant: classification.plant,
        predicted_disease: classification.label,
        confidence: classification.confidence,
        explanation,
        audio_url: audio.locator,
    }
}

//! Speech Synthesizer.
//!
//! Builds the spoken summary of a diagnosis, renders it through a
//! [`SpeechBackend`], and persists the audio in an [`AudioStore`].

mod gtts;
mod store;

use std::sync::Arc;

use async_trait::async_trait;

use leafscan_types::{
    is_healthy_label, AudioAsset, ClassificationResult, ExplanationDocument, Generated, Result,
};

pub use gtts::{split_text, GoogleTranslateTts, MAX_CHUNK_CHARS};
pub use store::AudioStore;

/// Spoken in place of a treatment when the explanation fell back.
pub const NO_TREATMENT_TEXT: &str =
    "No treatment available with me at this moment. Please contact a plant pathologist.";

/// Text-to-speech backend: text in, MP3 bytes out.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// Summary sentence(s) spoken for a diagnosis.
pub fn summary_for(
    classification: &ClassificationResult,
    explanation: &Generated<ExplanationDocument>,
) -> String {
    let plant = classification.plant;
    if is_healthy_label(&classification.label) {
        return format!("The {} plant, is detected healthy.", plant);
    }
    let treatment = explanation.recommended_treatment().unwrap_or(NO_TREATMENT_TEXT);
    format!(
        "For {} plant, the detected disease is {}. The recommended treatment is: {}.",
        plant, classification.label, treatment
    )
}

#[derive(Clone)]
pub struct SpeechSynthesizer {
    backend: Arc<dyn SpeechBackend>,
    store: AudioStore,
}

impl SpeechSynthesizer {
    pub fn new(backend: Arc<dyn SpeechBackend>, store: AudioStore) -> Self {
        Self { backend, store }
    }

    pub fn store(&self) -> &AudioStore {
        &self.store
    }

    /// Render `text` and persist it. Backend failures propagate; persistence
    /// failures are `AudioWrite`.
    pub async fn synthesize(&self, text: &str) -> Result<AudioAsset> {
        let audio = self.backend.synthesize(text).await?;
        self.store.persist(&audio).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use leafscan_types::{FallbackEnvelope, PlantType};

    fn classification(plant: PlantType, label: &str) -> ClassificationResult {
        ClassificationResult { plant, label: label.to_string(), confidence: 0.9 }
    }

    fn explanation(treatment: &str) -> Generated<ExplanationDocument> {
        Generated::Document(ExplanationDocument {
            disease_overview: String::new(),
            symptoms: String::new(),
            cause: String::new(),
            recommended_treatment: treatment.to_string(),
            prevention_tips: String::new(),
        })
    }

    #[test]
    fn test_healthy_summary() {
        let text = summary_for(&classification(PlantType::Potato, "Healthy"), &explanation("x"));
        assert_eq!(text, "The potato plant, is detected healthy.");
    }

    #[test]
    fn test_disease_summary_uses_treatment() {
        let text = summary_for(
            &classification(PlantType::Potato, "Early Blight"),
            &explanation("Apply chlorothalonil"),
        );
        assert_eq!(
            text,
            "For potato plant, the detected disease is Early Blight. \
             The recommended treatment is: Apply chlorothalonil."
        );
    }

    #[test]
    fn test_disease_summary_with_fallback_explanation() {
        let text = summary_for(
            &classification(PlantType::Tomato, "Leaf Mold"),
            &Generated::Fallback(FallbackEnvelope::invalid_json("oops")),
        );
        assert!(text.ends_with(&format!("The recommended treatment is: {}.", NO_TREATMENT_TEXT)));
    }

    struct StaticBackend;

    #[async_trait]
    impl SpeechBackend for StaticBackend {
        async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
            Ok(text.as_bytes().to_vec())
        }
    }

    #[tokio::test]
    async fn test_synthesize_persists_backend_audio() {
        let tmp = tempfile::tempdir().unwrap();
        let synthesizer = SpeechSynthesizer::new(Arc::new(StaticBackend), AudioStore::new(tmp.path()));

        let asset = synthesizer.synthesize("hello").await.unwrap();
        let path = synthesizer.store().path_for(asset.file_name()).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"hello");
    }
}

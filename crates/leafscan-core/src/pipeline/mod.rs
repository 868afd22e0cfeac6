//! Diagnosis Orchestration Pipeline.
//!
//! `classify -> generate -> repair -> synthesize -> assemble`, one sequential
//! chain per request. Every external collaborator comes in through
//! [`Capabilities`], built once at startup.


use std::sync::Arc;
use std::time::Duration;

use tracing::{info, info_span, warn, Instrument};

use leafscan_types::{
    DiagnosisError, DiagnosisResponse, DiagnosisStage, ExplanationDocument, FallbackEnvelope,
    Generated, LeafscanConfig, PlantInfoResponse, PlantType, Result,
};

use crate::assembler::assemble;
use crate::classifier::ClassificationDispatcher;
use crate::generator::{ChatCompletionsGenerator, StructuredTextGenerator, TextGenerator};
use crate::repair::{repair_explanation, repair_plant_info};
use crate::speech::{summary_for, AudioStore, GoogleTranslateTts, SpeechBackend, SpeechSynthesizer};

/// Immutable set of external collaborators the pipeline drives.
#[derive(Clone)]
pub struct Capabilities {
    pub classifier: ClassificationDispatcher,
    pub generator: Arc<dyn TextGenerator>,
    pub speech: Arc<dyn SpeechBackend>,
    pub audio: AudioStore,
}

impl Capabilities {
    /// HTTP-backed capabilities described by `config`.
    pub fn from_config(config: &LeafscanConfig) -> std::result::Result<Self, String> {
        Ok(Self {
            classifier: ClassificationDispatcher::from_config(&config.classifier)?,
            generator: Arc::new(ChatCompletionsGenerator::from_config(&config.generator)?),
            speech: Arc::new(GoogleTranslateTts::from_config(&config.speech)?),
            audio: AudioStore::new(&config.server.audio_dir),
        })
    }
}

#[derive(Clone)]
pub struct DiagnosisPipeline {
    classifier: ClassificationDispatcher,
    generator: StructuredTextGenerator,
    synthesizer: SpeechSynthesizer,
}

impl DiagnosisPipeline {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            classifier: capabilities.classifier,
            generator: StructuredTextGenerator::new(capabilities.generator),
            synthesizer: SpeechSynthesizer::new(capabilities.speech, capabilities.audio),
        }
    }

    pub fn audio_store(&self) -> &AudioStore {
        self.synthesizer.store()
    }

    /// Run the full chain for one uploaded image.
    ///
    /// Invalid plant, missing/undecodable image, inference and speech failures
    /// are fatal. A failed or unparseable explanation is not: it becomes a
    /// fallback envelope and the chain continues.
    pub async fn diagnose(&self, plant: &str, image: &[u8]) -> Result<DiagnosisResponse> {
        let span = info_span!("diagnosis", plant = %plant, size = image.len());
        self.run_chain(plant, image).instrument(span).await
    }

    /// [`diagnose`](Self::diagnose) under a deadline. On elapse the chain is
    /// dropped (partial audio is cleaned up) and the request times out.
    pub async fn diagnose_within(
        &self,
        plant: &str,
        image: &[u8],
        deadline: Duration,
    ) -> Result<DiagnosisResponse> {
        match tokio::time::timeout(deadline, self.diagnose(plant, image)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(plant = %plant, deadline_secs = deadline.as_secs(), "Diagnosis deadline elapsed");
                Err(DiagnosisError::UpstreamTimeout { service: "diagnosis".to_string() })
            }
        }
    }

    async fn run_chain(&self, plant: &str, image: &[u8]) -> Result<DiagnosisResponse> {
        stage(DiagnosisStage::Received);

        let classification = match self.classify(plant, image).await {
            Ok(c) => c,
            Err(e) => {
                warn!(stage = %DiagnosisStage::Rejected, error = %e, "Diagnosis rejected");
                return Err(e);
            }
        };
        info!(
            stage = %DiagnosisStage::Classified,
            label = %classification.label,
            confidence = classification.confidence,
            "Stage transition"
        );

        let explanation = self.explain(classification.plant, &classification.label).await;
        if explanation.is_fallback() {
            stage(DiagnosisStage::ExplanationFallback);
        } else {
            stage(DiagnosisStage::ExplanationReady);
        }

        let summary = summary_for(&classification, &explanation);
        let audio = self.synthesizer.synthesize(&summary).await.map_err(|e| {
            warn!(error = %e, "Speech synthesis failed");
            e
        })?;
        info!(stage = %DiagnosisStage::AudioSynthesized, audio_url = %audio.locator, "Stage transition");

        let response = assemble(classification, explanation, audio);
        stage(DiagnosisStage::Completed);
        Ok(response)
    }

    async fn classify(
        &self,
        plant: &str,
        image: &[u8],
    ) -> Result<leafscan_types::ClassificationResult> {
        let plant = PlantType::parse(plant)?;
        self.classifier.classify_plant(plant, image).await
    }

    async fn explain(&self, plant: PlantType, disease: &str) -> Generated<ExplanationDocument> {
        match self.generator.generate_explanation(plant, disease).await {
            Ok(raw) => repair_explanation(&raw),
            Err(e) => {
                warn!(error = %e, "Explanation generation failed");
                Generated::Fallback(FallbackEnvelope::generation_failed(e.to_string()))
            }
        }
    }

    /// General crop information. Only an invalid plant fails; generator
    /// problems become a fallback envelope.
    pub async fn plant_info(&self, plant: &str) -> Result<PlantInfoResponse> {
        let plant = PlantType::parse(plant)?;
        let info = match self.generator.generate_plant_info(plant).await {
            Ok(raw) => repair_plant_info(&raw),
            Err(e) => {
                warn!(plant = %plant, error = %e, "Plant info generation failed");
                Generated::Fallback(FallbackEnvelope::generation_failed(e.to_string()))
            }
        };
        Ok(PlantInfoResponse { info })
    }
}

fn stage(stage: DiagnosisStage) {
    info!(stage = %stage, "Stage transition");
}

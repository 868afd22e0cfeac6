//! Test helpers for leafscan-server unit tests.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use leafscan_core::{
    AudioStore, Capabilities, ClassificationDispatcher, DiagnosisPipeline, ImageTensor,
    InferenceModel, SpeechBackend, TextGenerator,
};
use leafscan_types::{LeafscanConfig, PlantType, Result};

use crate::state::AppState;

pub const EXPLANATION_JSON: &str = r#"{
    "disease_overview": "Early blight is a common fungal disease.",
    "symptoms": "Concentric brown rings on older leaves.",
    "cause": "Alternaria solani",
    "recommended_treatment": "Apply a copper based fungicide",
    "prevention_tips": "Rotate crops and remove debris."
}"#;

/// Always favours the first label of the plant's vocabulary.
struct FirstLabelModel {
    plant: PlantType,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl InferenceModel for FirstLabelModel {
    async fn predict(&self, _tensor: &ImageTensor) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let n = self.plant.vocabulary().len();
        let rest = 0.1 / (n - 1) as f32;
        Ok((0..n).map(|i| if i == 0 { 0.9 } else { rest }).collect())
    }
}

struct CannedGenerator {
    reply: String,
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.reply.clone())
    }
}

struct SilentSpeech {
    delay: Option<Duration>,
}

#[async_trait]
impl SpeechBackend for SilentSpeech {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(b"ID3audio".to_vec())
    }
}

/// Fake capabilities plus the temp audio directory they write into.
pub struct TestCapabilities {
    capabilities: Capabilities,
    model_calls: Arc<AtomicUsize>,
    _audio_dir: TempDir,
}

impl TestCapabilities {
    pub fn new(generator_reply: &str) -> Self {
        Self::build(generator_reply, None)
    }

    pub fn with_speech_delay(generator_reply: &str, delay: Duration) -> Self {
        Self::build(generator_reply, Some(delay))
    }

    fn build(generator_reply: &str, speech_delay: Option<Duration>) -> Self {
        let audio_dir = TempDir::new().expect("failed to create temp dir");
        let model_calls = Arc::new(AtomicUsize::new(0));

        let mut classifier = ClassificationDispatcher::new(8);
        for plant in PlantType::ALL {
            classifier = classifier.with_model(
                plant,
                Arc::new(FirstLabelModel { plant, calls: model_calls.clone() }),
            );
        }

        let capabilities = Capabilities {
            classifier,
            generator: Arc::new(CannedGenerator { reply: generator_reply.to_string() }),
            speech: Arc::new(SilentSpeech { delay: speech_delay }),
            audio: AudioStore::new(audio_dir.path().join("audio")),
        };
        Self { capabilities, model_calls, _audio_dir: audio_dir }
    }

    pub fn pipeline(&self) -> DiagnosisPipeline {
        DiagnosisPipeline::new(self.capabilities.clone())
    }

    pub fn model_calls(&self) -> usize {
        self.model_calls.load(Ordering::SeqCst)
    }
}

/// Create an `AppState` over fake capabilities.
///
/// Keep the returned `TestCapabilities` alive for the test duration; it owns
/// the audio directory.
pub fn test_app_state(generator_reply: &str) -> (AppState, TestCapabilities) {
    let caps = TestCapabilities::new(generator_reply);
    let state = AppState::new(caps.pipeline(), &LeafscanConfig::default());
    (state, caps)
}

/// A small valid PNG.
pub fn sample_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([30, 160, 40]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("png encoding");
    bytes
}

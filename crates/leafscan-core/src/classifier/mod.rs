//! Classification Dispatcher.
//!
//! Routes an image to the model trained for the requested plant and turns the
//! model's score vector into a [`ClassificationResult`].

mod remote;
mod tensor;


use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use leafscan_types::models::config::ClassifierConfig;
use leafscan_types::{ClassificationResult, DiagnosisError, PlantType, Result};

pub use remote::RemoteModel;
pub use tensor::{ImageTensor, TensorInstance};

/// Black-box classification model: tensor in, one score per vocabulary entry out.
#[async_trait]
pub trait InferenceModel: Send + Sync {
    async fn predict(&self, tensor: &ImageTensor) -> Result<Vec<f32>>;
}

/// Holds one model per plant. Immutable after construction.
#[derive(Clone)]
pub struct ClassificationDispatcher {
    models: HashMap<PlantType, Arc<dyn InferenceModel>>,
    input_size: u32,
}

impl ClassificationDispatcher {
    pub fn new(input_size: u32) -> Self {
        Self { models: HashMap::new(), input_size }
    }

    pub fn with_model(mut self, plant: PlantType, model: Arc<dyn InferenceModel>) -> Self {
        self.models.insert(plant, model);
        self
    }

    /// Remote models for every plant, sharing one HTTP client.
    pub fn from_config(config: &ClassifierConfig) -> std::result::Result<Self, String> {
        let client = crate::upstream::build_http_client(config.timeout_secs)?;
        let dispatcher = PlantType::ALL.iter().fold(Self::new(config.input_size), |acc, &plant| {
            let model = RemoteModel::new(client.clone(), plant, config.models.endpoint(plant));
            acc.with_model(plant, Arc::new(model))
        });
        Ok(dispatcher)
    }

    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    /// Classify `image` as one of `plant`'s labels.
    ///
    /// The plant name is validated before anything else; an unknown plant
    /// never reaches a model.
    pub async fn classify(&self, plant: &str, image: &[u8]) -> Result<ClassificationResult> {
        let plant = PlantType::parse(plant)?;
        self.classify_plant(plant, image).await
    }

    /// Same as [`classify`](Self::classify) for an already-parsed plant.
    pub async fn classify_plant(
        &self,
        plant: PlantType,
        image: &[u8],
    ) -> Result<ClassificationResult> {
        if image.is_empty() {
            return Err(DiagnosisError::MissingImage);
        }
        let model = self.models.get(&plant).ok_or_else(|| DiagnosisError::Inference {
            message: format!("no model configured for {}", plant),
        })?;

        let bytes = image.to_vec();
        let size = self.input_size;
        let tensor = tokio::task::spawn_blocking(move || ImageTensor::from_image_bytes(&bytes, size))
            .await
            .map_err(|e| DiagnosisError::ImageDecode { message: e.to_string() })??;

        let scores = model.predict(&tensor).await?;
        let (label, confidence) = pick_label(plant, &scores)?;
        debug!(plant = %plant, label, confidence, "Classified image");

        Ok(ClassificationResult { plant, label: label.to_string(), confidence })
    }
}

/// Argmax over `scores` with first-index tie-break. The winning score is
/// reported as the `f64` nearest its shortest decimal form.
///
/// Fails when the vector does not line up with the plant's vocabulary or holds
/// a non-finite value.
pub fn pick_label(plant: PlantType, scores: &[f32]) -> Result<(&'static str, f64)> {
    let vocabulary = plant.vocabulary();
    if scores.len() != vocabulary.len() {
        return Err(DiagnosisError::Inference {
            message: format!(
                "{} model returned {} scores, expected {}",
                plant,
                scores.len(),
                vocabulary.len()
            ),
        });
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(DiagnosisError::Inference {
            message: format!("{} model returned a non-finite score", plant),
        });
    }

    let mut best = 0;
    for (idx, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = idx;
        }
    }
    Ok((vocabulary[best], widen_score(scores[best].clamp(0.0, 1.0))))
}

/// `0.9f32` becomes `0.9`, not `0.8999999761581421`.
fn widen_score(score: f32) -> f64 {
    score.to_string().parse().unwrap_or_else(|_| f64::from(score))
}

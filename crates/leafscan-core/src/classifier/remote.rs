//! TensorFlow-Serving style REST model.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use leafscan_types::{DiagnosisError, PlantType, Result};

use super::{ImageTensor, InferenceModel};
use crate::upstream::{ensure_success, malformed_body, transport_error};

const SERVICE: &str = "classifier";

#[derive(Deserialize)]
struct PredictResponse {
    predictions: Vec<Vec<f32>>,
}

/// Posts `{"instances": [tensor]}` to a predict endpoint and reads
/// `predictions[0]`.
pub struct RemoteModel {
    client: reqwest::Client,
    plant: PlantType,
    endpoint: String,
}

impl RemoteModel {
    pub fn new(client: reqwest::Client, plant: PlantType, endpoint: impl Into<String>) -> Self {
        Self { client, plant, endpoint: endpoint.into() }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl InferenceModel for RemoteModel {
    async fn predict(&self, tensor: &ImageTensor) -> Result<Vec<f32>> {
        let body = json!({ "instances": [tensor.instance()] });
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;
        let resp = ensure_success(SERVICE, resp).await?;

        let parsed: PredictResponse =
            resp.json().await.map_err(|e| malformed_body(SERVICE, e))?;
        parsed.predictions.into_iter().next().ok_or_else(|| DiagnosisError::Inference {
            message: format!("{} model returned no predictions", self.plant),
        })
    }
}

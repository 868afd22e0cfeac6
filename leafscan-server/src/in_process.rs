//! Tool backend that drives the pipeline directly instead of over HTTP.
//!
//! Answers are shaped exactly like the HTTP handlers' (same status codes, same
//! `{"detail"}` bodies), so the Tool Adapter cannot tell the two apart.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde::Serialize;

use leafscan_client::{BackendResponse, ClientConfig, ClientError, DiagnosisBackend};
use leafscan_core::DiagnosisPipeline;
use leafscan_types::models::config::ToolsConfig;
use leafscan_types::models::{HealthResponse, AUDIO_MIME, AUDIO_ROUTE_PREFIX};

use crate::api::{load_audio, ApiError};

const LOCATION: &str = "in-process";

pub struct InProcessBackend {
    pipeline: DiagnosisPipeline,
    budgets: ClientConfig,
}

impl InProcessBackend {
    pub fn new(pipeline: DiagnosisPipeline, tools: &ToolsConfig) -> Self {
        Self { pipeline, budgets: ClientConfig::from(tools) }
    }
}

/// Run `fut` within `budget`, reporting elapse as a transport timeout.
async fn bounded<F>(budget: Duration, fut: F) -> Result<BackendResponse, ClientError>
where
    F: Future<Output = BackendResponse>,
{
    tokio::time::timeout(budget, fut).await.map_err(|_| ClientError::Timeout(budget.as_secs()))
}

fn ok_json<T: Serialize>(value: &T) -> BackendResponse {
    match serde_json::to_value(value) {
        Ok(body) => BackendResponse::json(StatusCode::OK.as_u16(), &body),
        Err(e) => error_response(&ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

fn error_response(err: &ApiError) -> BackendResponse {
    BackendResponse::json(err.status().as_u16(), &err.body())
}

#[async_trait]
impl DiagnosisBackend for InProcessBackend {
    fn location(&self) -> &str {
        LOCATION
    }

    async fn health(&self) -> Result<BackendResponse, ClientError> {
        Ok(ok_json(&HealthResponse::healthy()))
    }

    async fn analyze(
        &self,
        plant: &str,
        _file_name: &str,
        _mime: &str,
        image: Vec<u8>,
    ) -> Result<BackendResponse, ClientError> {
        bounded(self.budgets.analyze_timeout, async {
            match self.pipeline.diagnose(plant, &image).await {
                Ok(response) => ok_json(&response),
                Err(e) => error_response(&ApiError::from(e)),
            }
        })
        .await
    }

    async fn fetch_audio(&self, path: &str) -> Result<BackendResponse, ClientError> {
        let Some(file_name) = path.strip_prefix(AUDIO_ROUTE_PREFIX) else {
            return Ok(error_response(&ApiError::new(StatusCode::NOT_FOUND, "Not Found")));
        };
        bounded(self.budgets.audio_timeout, async {
            match load_audio(self.pipeline.audio_store(), file_name).await {
                Ok(bytes) => {
                    BackendResponse::new(StatusCode::OK.as_u16(), Some(AUDIO_MIME.to_string()), bytes)
                }
                Err(e) => error_response(&e),
            }
        })
        .await
    }

    async fn plant_info(&self, plant: &str) -> Result<BackendResponse, ClientError> {
        bounded(self.budgets.plant_info_timeout, async {
            match self.pipeline.plant_info(plant).await {
                Ok(info) => ok_json(&info),
                Err(e) => error_response(&ApiError::from(e)),
            }
        })
        .await
    }
}

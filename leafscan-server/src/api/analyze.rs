//! `POST /analyze`: run one diagnosis over an uploaded leaf image.

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        Query, State,
    },
    response::Json,
};
use serde::Deserialize;
use tracing::debug;

use leafscan_types::{DiagnosisError, DiagnosisResponse, PlantType};

use super::error::ApiError;
use crate::state::AppState;

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    pub plant: Option<String>,
}

/// The plant is validated before the upload is read, so an invalid plant
/// never costs a body read or an upstream call.
pub async fn analyze(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DiagnosisResponse>, ApiError> {
    let plant = PlantType::parse(query.plant.as_deref().unwrap_or_default())?;
    let mut multipart = multipart.map_err(|e| ApiError::new(e.status(), e.body_text()))?;

    let image = read_file_field(&mut multipart).await?;
    debug!(plant = %plant, size = image.len(), "Received upload");

    let response =
        state.pipeline().diagnose_within(plant.as_str(), &image, state.request_timeout()).await?;
    Ok(Json(response))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) =
        multipart.next_field().await.map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        if field.name() == Some(FILE_FIELD) {
            let bytes = field.bytes().await.map_err(|e| ApiError::new(e.status(), e.body_text()))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(DiagnosisError::MissingImage.into())
}

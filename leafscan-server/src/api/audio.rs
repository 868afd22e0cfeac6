//! `GET /audio/{filename}`: serve a synthesized asset.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use tracing::warn;

use leafscan_core::AudioStore;
use leafscan_types::models::AUDIO_MIME;

use super::error::ApiError;
use crate::state::AppState;

pub async fn get_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = load_audio(state.audio_store(), &filename).await?;
    Ok(([(header::CONTENT_TYPE, AUDIO_MIME)], bytes))
}

/// Read a stored asset. Names that are not a single plain path component are
/// rejected before touching the filesystem.
pub async fn load_audio(store: &AudioStore, file_name: &str) -> Result<Vec<u8>, ApiError> {
    let path = store
        .path_for(file_name)
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "Invalid audio file name"))?;

    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiError::new(StatusCode::NOT_FOUND, "Audio file not found"))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read audio");
            Err(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read audio file"))
        }
    }
}

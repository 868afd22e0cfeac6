use axum::{
    extract::{Path, State},
    response::Json,
};

use leafscan_types::PlantInfoResponse;

use super::error::ApiError;
use crate::state::AppState;

/// `GET /plant_info/{plant}`. Generator trouble comes back as a fallback
/// envelope inside a 200; only an unknown plant is an error.
pub async fn plant_info(
    State(state): State<AppState>,
    Path(plant): Path<String>,
) -> Result<Json<PlantInfoResponse>, ApiError> {
    Ok(Json(state.pipeline().plant_info(&plant).await?))
}

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use leafscan_types::models::HealthResponse;

use crate::api;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.server_config().max_upload_bytes;

    Router::<AppState>::new()
        .merge(api::router())
        .route("/", get(root))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
}

async fn root() -> impl IntoResponse {
    Json(json!({"message": "API Server is running.."}))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

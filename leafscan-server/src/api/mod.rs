//! API Routes
//!
//! Direct transport endpoints over the diagnosis pipeline.

mod analyze;
mod audio;
pub mod error;
mod plant_info;


use axum::{
    routing::{get, post},
    Router,
};

use crate::mcp;
use crate::state::AppState;

pub use audio::load_audio;
pub use error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze::analyze))
        .route("/plant_info/:plant", get(plant_info::plant_info))
        .route("/audio/:filename", get(audio::get_audio))
        // Tool transport over the in-process backend
        .route("/mcp", post(mcp::handle_http))
}

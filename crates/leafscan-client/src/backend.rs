//! Remote-call capability used by the tool adapter.

use async_trait::async_trait;

use crate::{BackendResponse, ClientError};

/// The four backend operations the tools are built on.
///
/// Implementations return the backend's answer for any status code; only
/// transport failures are errors. Each call is bounded by its own budget.
#[async_trait]
pub trait DiagnosisBackend: Send + Sync {
    /// Human-readable location, used in error details.
    fn location(&self) -> &str;

    async fn health(&self) -> Result<BackendResponse, ClientError>;

    /// Upload `image` for analysis. `plant` is already validated.
    async fn analyze(
        &self,
        plant: &str,
        file_name: &str,
        mime: &str,
        image: Vec<u8>,
    ) -> Result<BackendResponse, ClientError>;

    /// Fetch an audio asset; `path` starts with `/`.
    async fn fetch_audio(&self, path: &str) -> Result<BackendResponse, ClientError>;

    async fn plant_info(&self, plant: &str) -> Result<BackendResponse, ClientError>;
}

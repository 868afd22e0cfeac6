//! Tool Adapter.
//!
//! Exposes the backend operations as named tools. Every tool returns a JSON
//! value, either its success payload or an [`ErrorEnvelope`]; nothing here
//! returns a Rust error or panics.

mod media;
mod payload;
mod specs;


use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use leafscan_types::tool::{AudioFormat, AudioPayload, HealthReport, HealthStatus};
use leafscan_types::{ErrorEnvelope, ErrorKind, PlantType};

use crate::{BackendResponse, ClientError, DiagnosisBackend};

pub use media::{encode_base64, normalize_audio_path, upload_mime};
pub use payload::{normalize, ToolPayload};
pub use specs::tool_specs;

/// Largest image `analyze_plant` reads unless configured otherwise.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

/// Budget for reading and uploading one image unless configured otherwise.
pub const DEFAULT_ANALYZE_BUDGET: Duration = Duration::from_secs(30);

/// Dispatches tool calls to a [`DiagnosisBackend`].
#[derive(Clone)]
pub struct ToolAdapter {
    backend: Arc<dyn DiagnosisBackend>,
    max_image_bytes: u64,
    analyze_budget: Duration,
}

impl ToolAdapter {
    pub fn new(backend: Arc<dyn DiagnosisBackend>) -> Self {
        Self {
            backend,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            analyze_budget: DEFAULT_ANALYZE_BUDGET,
        }
    }

    /// Cap the image size `analyze_plant` accepts and bound the whole call,
    /// file read included, by `analyze_budget`.
    pub fn with_image_limits(mut self, max_image_bytes: u64, analyze_budget: Duration) -> Self {
        self.max_image_bytes = max_image_bytes;
        self.analyze_budget = analyze_budget;
        self
    }

    /// Run `name` with JSON `arguments`. Unknown tools and malformed
    /// arguments produce an `Unexpected error` envelope.
    pub async fn call_tool(&self, name: &str, arguments: &Value) -> Value {
        debug!(tool = name, "Tool call");
        match name {
            "health_check" => self.health_check().await,
            "analyze_plant" => match (str_arg(arguments, "plant"), str_arg(arguments, "image_path")) {
                (Ok(plant), Ok(image_path)) => self.analyze_plant(plant, image_path).await,
                (Err(e), _) | (_, Err(e)) => e.to_value(),
            },
            "play_audio" => match str_arg(arguments, "audio_url") {
                Ok(audio_url) => self.play_audio(audio_url).await,
                Err(e) => e.to_value(),
            },
            "plant_info" => match str_arg(arguments, "plant") {
                Ok(plant) => self.plant_info(plant).await,
                Err(e) => e.to_value(),
            },
            other => ErrorEnvelope::new(ErrorKind::Unexpected)
                .with_details(format!("Unknown tool: {}", other))
                .to_value(),
        }
    }

    /// Probe the backend. Reachability problems are reported as a status,
    /// never as an error envelope.
    pub async fn health_check(&self) -> Value {
        let report = match self.backend.health().await {
            Ok(resp) if resp.status == 200 => {
                let body = if resp.is_json() {
                    resp.json_body().unwrap_or_else(|| Value::String(resp.text()))
                } else {
                    Value::String(resp.text())
                };
                HealthReport::healthy(self.backend.location(), body)
            }
            Ok(resp) => HealthReport::unhealthy(resp.status, resp.text()),
            Err(ClientError::Connection(_)) => HealthReport::with_status(
                HealthStatus::Unreachable,
                format!("Cannot connect to backend at {}", self.backend.location()),
            ),
            Err(e) => HealthReport::with_status(HealthStatus::Error, e.to_string()),
        };
        serde_json::to_value(report).unwrap_or_else(|e| unexpected(&e.to_string()))
    }

    /// Upload a local image for diagnosis.
    pub async fn analyze_plant(&self, plant: &str, image_path: &str) -> Value {
        let plant = match PlantType::parse(plant) {
            Ok(plant) => plant,
            Err(_) => {
                return ErrorEnvelope::new(ErrorKind::InvalidPlantType)
                    .with_details(format!(
                        "Plant must be one of: {}",
                        PlantType::supported_names().join(", ")
                    ))
                    .with_supported_plants(PlantType::supported_names())
                    .to_value();
            }
        };

        let budget = self.analyze_budget;
        match tokio::time::timeout(budget, self.upload_image(plant, image_path)).await {
            Ok(value) => value,
            Err(_) => {
                warn!(image_path, budget = ?budget, "Image analysis timed out");
                ErrorEnvelope::new(ErrorKind::Timeout)
                    .with_details(format!("Analysis did not finish within {:?}", budget))
                    .to_value()
            }
        }
    }

    async fn upload_image(&self, plant: PlantType, image_path: &str) -> Value {
        let path = Path::new(image_path);
        let is_regular_file = tokio::fs::metadata(path).await.is_ok_and(|meta| meta.is_file());
        if !is_regular_file {
            return ErrorEnvelope::new(ErrorKind::FileNotFound)
                .with_details(format!("Image file does not exist: {}", image_path))
                .to_value();
        }
        let image = match read_capped(path, self.max_image_bytes).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                return unexpected(&format!(
                    "Image file exceeds the {} byte limit",
                    self.max_image_bytes
                ));
            }
            Err(e) => return unexpected(&ClientError::Io(e.to_string()).to_string()),
        };
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        match self.backend.analyze(plant.as_str(), &file_name, upload_mime(path), image).await {
            Ok(resp) if resp.is_success() => success_body(&resp),
            Ok(resp) => ErrorEnvelope::new(ErrorKind::BackendStatus)
                .with_status(resp.status)
                .with_details(resp.text())
                .to_value(),
            Err(e) => self.transport_failure(&e),
        }
    }

    /// Download an audio asset and return it base64-encoded.
    pub async fn play_audio(&self, audio_url: &str) -> Value {
        let path = normalize_audio_path(audio_url);
        match self.backend.fetch_audio(&path).await {
            Ok(resp) if resp.is_success() => {
                let payload = AudioPayload {
                    success: true,
                    audio_data: encode_base64(&resp.body),
                    format: AudioFormat::from_locator(&path),
                    size_bytes: resp.body.len(),
                };
                serde_json::to_value(payload).unwrap_or_else(|e| unexpected(&e.to_string()))
            }
            Ok(resp) => ErrorEnvelope::new(ErrorKind::AudioDownload)
                .with_status(resp.status)
                .with_details(resp.text())
                .to_value(),
            Err(e) => self.transport_failure(&e),
        }
    }

    /// General information about a crop.
    pub async fn plant_info(&self, plant: &str) -> Value {
        let Ok(plant) = PlantType::parse(plant) else {
            return ErrorEnvelope::new(ErrorKind::InvalidPlantType)
                .with_supported_plants(PlantType::supported_names())
                .to_value();
        };

        match self.backend.plant_info(plant.as_str()).await {
            Ok(resp) if resp.is_success() => success_body(&resp),
            Ok(resp) if resp.status == 404 => ErrorEnvelope::new(ErrorKind::EndpointNotImplemented)
                .with_details("Backend does not have a /plant_info endpoint")
                .to_value(),
            Ok(resp) => ErrorEnvelope::new(ErrorKind::ApiError)
                .with_status(resp.status)
                .with_details(resp.text())
                .to_value(),
            Err(e) => self.transport_failure(&e),
        }
    }

    fn transport_failure(&self, err: &ClientError) -> Value {
        warn!(backend = self.backend.location(), error = %err, "Backend call failed");
        let envelope = match err {
            ClientError::Timeout(secs) => ErrorEnvelope::new(ErrorKind::Timeout)
                .with_details(format!("Backend did not respond within {} seconds", secs)),
            ClientError::Connection(_) => ErrorEnvelope::new(ErrorKind::ConnectionFailed)
                .with_details(format!("Could not connect to backend at {}", self.backend.location())),
            other => ErrorEnvelope::new(ErrorKind::Unexpected).with_details(other.to_string()),
        };
        envelope.to_value()
    }
}

/// Decode and normalize a 2xx body.
fn success_body(resp: &BackendResponse) -> Value {
    let Some(value) = resp.json_body() else {
        return unexpected(&format!("Backend returned a non-JSON body: {}", resp.text()));
    };
    normalize(value).unwrap_or_else(|| unexpected("Backend returned an empty response"))
}

/// Read at most `max_bytes`; `None` when the file is larger.
async fn read_capped(path: &Path, max_bytes: u64) -> std::io::Result<Option<Vec<u8>>> {
    let file = tokio::fs::File::open(path).await?;
    let mut bytes = Vec::new();
    file.take(max_bytes.saturating_add(1)).read_to_end(&mut bytes).await?;
    if bytes.len() as u64 > max_bytes {
        return Ok(None);
    }
    Ok(Some(bytes))
}

fn unexpected(details: &str) -> Value {
    ErrorEnvelope::new(ErrorKind::Unexpected).with_details(details).to_value()
}

fn str_arg<'a>(arguments: &'a Value, key: &str) -> Result<&'a str, ErrorEnvelope> {
    arguments.get(key).and_then(Value::as_str).ok_or_else(|| {
        ErrorEnvelope::new(ErrorKind::Unexpected)
            .with_details(format!("Missing or non-string argument: {}", key))
    })
}

/// Whether a tool result is an error envelope.
pub fn is_error_payload(value: &Value) -> bool {
    value.get("error").is_some()
}

/// Tool result as the JSON-RPC `tools/call` content block.
pub fn to_call_result(value: &Value) -> Value {
    json!({
        "content": [{ "type": "text", "text": value.to_string() }],
        "isError": is_error_payload(value),
    })
}

//! `check`: smoke-test a running backend through the diagnosis tools.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use serde_json::Value;

use leafscan_client::tools::is_error_payload;
use leafscan_client::{ClientConfig, LeafscanClient, ToolAdapter};
use leafscan_types::models::config::ToolsConfig;
use leafscan_types::ErrorEnvelope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Passed,
    Failed,
    Skipped,
}

struct Step {
    tool: &'static str,
    outcome: Outcome,
    summary: String,
}

impl Step {
    fn from_result(tool: &'static str, result: &Value) -> Self {
        if is_error_payload(result) {
            return Self { tool, outcome: Outcome::Failed, summary: error_summary(result) };
        }
        Self { tool, outcome: Outcome::Passed, summary: success_summary(tool, result) }
    }

    fn skipped(tool: &'static str, reason: &str) -> Self {
        Self { tool, outcome: Outcome::Skipped, summary: reason.to_string() }
    }
}

pub async fn run_check(
    tools: &ToolsConfig,
    backend_url: Option<String>,
    plant: &str,
    image: Option<&Path>,
) -> Result<()> {
    let mut config = ClientConfig::from(tools);
    if let Some(url) = backend_url {
        config.base_url = url;
    }
    let base_url = config.base_url.clone();
    let adapter = ToolAdapter::new(Arc::new(LeafscanClient::new(config)?));

    println!("{} {}", "Checking backend at".cyan().bold(), base_url);
    let steps = run_steps(&adapter, plant, image).await;
    print_table(&steps);

    let failed = steps.iter().filter(|s| s.outcome == Outcome::Failed).count();
    if failed > 0 {
        anyhow::bail!("{} of {} checks failed", failed, steps.len());
    }
    println!("{} All checks passed", "✓".green());
    Ok(())
}

async fn run_steps(adapter: &ToolAdapter, plant: &str, image: Option<&Path>) -> Vec<Step> {
    let mut steps = Vec::with_capacity(4);

    let health = adapter.health_check().await;
    let healthy = health.get("status").and_then(Value::as_str) == Some("healthy");
    steps.push(Step {
        tool: "health_check",
        outcome: if healthy { Outcome::Passed } else { Outcome::Failed },
        summary: success_summary("health_check", &health),
    });

    match image {
        Some(path) => {
            let diagnosis = adapter.analyze_plant(plant, &path.to_string_lossy()).await;
            steps.push(Step::from_result("analyze_plant", &diagnosis));

            match diagnosis.get("audio_url").and_then(Value::as_str) {
                Some(audio_url) if !is_error_payload(&diagnosis) => {
                    let audio = adapter.play_audio(audio_url).await;
                    steps.push(Step::from_result("play_audio", &audio));
                }
                _ => steps.push(Step::skipped("play_audio", "no audio_url from analysis")),
            }
        }
        None => {
            steps.push(Step::skipped("analyze_plant", "no image given"));
            steps.push(Step::skipped("play_audio", "no image given"));
        }
    }

    let info = adapter.plant_info(plant).await;
    steps.push(Step::from_result("plant_info", &info));
    steps
}

fn error_summary(result: &Value) -> String {
    match ErrorEnvelope::from_value(result) {
        Some(envelope) => match envelope.details {
            Some(details) => format!("{}: {}", envelope.error, details),
            None => envelope.error.to_string(),
        },
        None => result.to_string(),
    }
}

fn success_summary(tool: &str, result: &Value) -> String {
    let field = |key: &str| result.get(key).and_then(Value::as_str).unwrap_or("-").to_string();
    match tool {
        "health_check" => match result.get("details").and_then(Value::as_str) {
            Some(details) => format!("{} ({})", field("status"), details),
            None => field("status"),
        },
        "analyze_plant" => {
            let confidence = result.get("confidence").and_then(Value::as_f64).unwrap_or_default();
            format!("{} ({:.1}%)", field("predicted_disease"), confidence * 100.0)
        }
        "play_audio" => {
            let size = result.get("size_bytes").and_then(Value::as_u64).unwrap_or_default();
            format!("{} bytes of {}", size, field("format"))
        }
        "plant_info" => match result.get("info").and_then(|info| info.get("error")) {
            Some(err) => format!("fallback: {}", err.as_str().unwrap_or("unknown")),
            None => "document".to_string(),
        },
        _ => result.to_string(),
    }
}

fn print_table(steps: &[Step]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Tool", "Result", "Details"]);

    for step in steps {
        let outcome = match step.outcome {
            Outcome::Passed => Cell::new("Passed").fg(Color::Green),
            Outcome::Failed => Cell::new("Failed").fg(Color::Red),
            Outcome::Skipped => Cell::new("Skipped").fg(Color::Yellow),
        };
        table.add_row(vec![Cell::new(step.tool), outcome, Cell::new(&step.summary)]);
    }

    println!("{table}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, reason = "test assertions")]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_error_summary_includes_details() {
        let result = json!({"error": "Request timed out", "details": "Backend did not respond within 30 seconds"});
        assert_eq!(
            error_summary(&result),
            "Request timed out: Backend did not respond within 30 seconds"
        );
    }

    #[test]
    fn test_success_summaries() {
        let diagnosis = json!({"predicted_disease": "Late Blight", "confidence": 0.875});
        assert_eq!(success_summary("analyze_plant", &diagnosis), "Late Blight (87.5%)");

        let info = json!({"info": {"error": "Invalid JSON", "raw": "x"}});
        assert_eq!(success_summary("plant_info", &info), "fallback: Invalid JSON");
    }

    #[tokio::test]
    async fn test_steps_without_image_skip_analysis() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "healthy", "message": "LeafScan server is running"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/plant_info/potato"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"info": {"plant_info": "Staple crop", "common_diseases": "Blight"}}),
            ))
            .mount(&server)
            .await;

        let client = LeafscanClient::new(ClientConfig::new(server.uri())).unwrap();
        let adapter = ToolAdapter::new(Arc::new(client));
        let steps = run_steps(&adapter, "potato", None).await;

        let outcomes: Vec<Outcome> = steps.iter().map(|s| s.outcome).collect();
        assert_eq!(
            outcomes,
            vec![Outcome::Passed, Outcome::Skipped, Outcome::Skipped, Outcome::Passed]
        );
        assert_eq!(steps[3].summary, "document");
    }

    #[tokio::test]
    async fn test_unreachable_backend_fails_check() {
        let tools = ToolsConfig {
            backend_url: "http://127.0.0.1:9".to_string(),
            ..ToolsConfig::default()
        };
        assert!(run_check(&tools, None, "potato", None).await.is_err());
    }
}

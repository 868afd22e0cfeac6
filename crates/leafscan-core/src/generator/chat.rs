//! OpenAI-compatible chat completions backend.

use async_trait::async_trait;
use serde_json::{json, Value};

use leafscan_types::models::config::GeneratorConfig;
use leafscan_types::Result;

use super::TextGenerator;
use crate::upstream::{build_http_client, ensure_success, malformed_body, transport_error};

const SERVICE: &str = "generator";

/// Sends each prompt as a single user message and returns
/// `choices[0].message.content`.
pub struct ChatCompletionsGenerator {
    client: reqwest::Client,
    completions_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl ChatCompletionsGenerator {
    pub fn new(client: reqwest::Client, config: &GeneratorConfig) -> Self {
        Self {
            client,
            completions_url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> std::result::Result<Self, String> {
        Ok(Self::new(build_http_client(config.timeout_secs)?, config))
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.temperature,
        });

        let resp = self
            .client
            .post(&self.completions_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;
        let resp = ensure_success(SERVICE, resp).await?;

        let v: Value = resp.json().await.map_err(|e| malformed_body(SERVICE, e))?;
        let content = v
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| malformed_body(SERVICE, "missing choices[0].message.content"))?;

        Ok(content.to_string())
    }
}

//! External capability configuration: classifier models, text generator, speech.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::PlantType;

/// Per-plant inference endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct ModelEndpoints {
    #[serde(default = "default_potato_endpoint")]
    #[validate(url)]
    pub potato: String,
    #[serde(default = "default_tomato_endpoint")]
    #[validate(url)]
    pub tomato: String,
    #[serde(default = "default_pepper_endpoint")]
    #[validate(url)]
    pub pepper: String,
}

impl ModelEndpoints {
    pub fn endpoint(&self, plant: PlantType) -> &str {
        match plant {
            PlantType::Potato => &self.potato,
            PlantType::Tomato => &self.tomato,
            PlantType::Pepper => &self.pepper,
        }
    }
}

impl Default for ModelEndpoints {
    fn default() -> Self {
        Self {
            potato: default_potato_endpoint(),
            tomato: default_tomato_endpoint(),
            pepper: default_pepper_endpoint(),
        }
    }
}

/// Classification model settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct ClassifierConfig {
    /// Square edge length, in pixels, the models expect
    #[serde(default = "default_input_size")]
    #[validate(range(min = 8_u32, max = 2048_u32))]
    pub input_size: u32,
    #[serde(default = "default_classifier_timeout")]
    #[validate(range(min = 1_u64))]
    pub timeout_secs: u64,
    #[serde(default)]
    #[validate(nested)]
    pub models: ModelEndpoints,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            input_size: default_input_size(),
            timeout_secs: default_classifier_timeout(),
            models: ModelEndpoints::default(),
        }
    }
}

/// OpenAI-compatible chat completions backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct GeneratorConfig {
    #[serde(default = "default_generator_base_url")]
    #[validate(url)]
    pub base_url: String,
    /// Bearer key; `GROQ_API_KEY` overrides it at load time
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_generator_model")]
    #[validate(length(min = 1_u64))]
    pub model: String,
    #[serde(default = "default_temperature")]
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    #[serde(default = "default_generator_timeout")]
    #[validate(range(min = 1_u64))]
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: default_generator_base_url(),
            api_key: String::new(),
            model: default_generator_model(),
            temperature: default_temperature(),
            timeout_secs: default_generator_timeout(),
        }
    }
}

/// Text-to-speech backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct SpeechConfig {
    #[serde(default = "default_speech_base_url")]
    #[validate(url)]
    pub base_url: String,
    /// Spoken language tag
    #[serde(default = "default_language")]
    #[validate(length(min = 2_u64))]
    pub language: String,
    #[serde(default = "default_speech_timeout")]
    #[validate(range(min = 1_u64))]
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: default_speech_base_url(),
            language: default_language(),
            timeout_secs: default_speech_timeout(),
        }
    }
}

fn default_potato_endpoint() -> String {
    "http://localhost:8501/v1/models/potato_disease_model_v2:predict".to_string()
}

fn default_tomato_endpoint() -> String {
    "http://localhost:8501/v1/models/tomato_disease_model_v2:predict".to_string()
}

fn default_pepper_endpoint() -> String {
    "http://localhost:8501/v1/models/pepper_disease_model_v2:predict".to_string()
}

const fn default_input_size() -> u32 {
    256
}

const fn default_classifier_timeout() -> u64 {
    30
}

fn default_generator_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_generator_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

const fn default_temperature() -> f32 {
    0.2
}

const fn default_generator_timeout() -> u64 {
    60
}

fn default_speech_base_url() -> String {
    "https://translate.google.com".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_speech_timeout() -> u64 {
    30
}

//! Structured Text Generator.

mod chat;
pub mod prompts;

use std::sync::Arc;

use async_trait::async_trait;

use leafscan_types::{PlantType, Result};

pub use chat::ChatCompletionsGenerator;

/// Generative text backend: prompt in, free-form text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Renders the fixed prompt templates and hands them to a [`TextGenerator`].
///
/// The returned text is raw; callers repair it into a document. Transport
/// errors propagate unchanged.
#[derive(Clone)]
pub struct StructuredTextGenerator {
    backend: Arc<dyn TextGenerator>,
}

impl StructuredTextGenerator {
    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self { backend }
    }

    pub async fn generate_explanation(&self, plant: PlantType, disease: &str) -> Result<String> {
        self.backend.complete(&prompts::explanation_prompt(plant, disease)).await
    }

    pub async fn generate_plant_info(&self, plant: PlantType) -> Result<String> {
        self.backend.complete(&prompts::plant_info_prompt(plant)).await
    }
}

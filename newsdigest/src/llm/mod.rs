use anyhow::Result;
use serde::Serialize;

pub mod huggingface;
pub mod remote;
pub mod summarizer;

/// Text-to-text summarization capability (local or remote model)
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `text` within the given generation bounds
    async fn summarize(&self, text: &str, params: &GenerationParams) -> Result<String>;
}

/// Generation bounds passed with every summarization request. Fixed at 130/30, greedy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationParams {
    /// Maximum summary length in tokens
    pub max_length: usize,
    /// Minimum summary length in tokens
    pub min_length: usize,
    /// Greedy decoding, no sampling
    pub deterministic: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 130,
            min_length: 30,
            deterministic: true,
        }
    }
}

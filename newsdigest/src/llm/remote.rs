use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{GenerationParams, Summarizer};

/// Summarizer using an OpenAI-compatible chat completions API
pub struct RemoteLlmProvider {
    base_url: String,
    api_key: Option<String>,
    model: String,
    default_timeout: Duration,
    client: reqwest::Client,
}

/// Request structure for a single completion
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub prompt: String,
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
}

/// Response from a completion
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub usage: UsageMetadata,
    pub model: String,
}

#[derive(Debug, Clone, Default)]
pub struct UsageMetadata {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

impl RemoteLlmProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            model: model.into(),
            default_timeout: Duration::from_secs(30),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.default_timeout = Duration::from_secs(timeout_secs);
        self
    }

    /// Send one completion request. The deadline covers the response body too.
    pub async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        tokio::time::timeout(self.default_timeout, self.request_completion(request))
            .await
            .context("LLM request timed out")?
    }

    async fn request_completion(&self, request: LlmRequest) -> Result<LlmResponse> {
        let req_body = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let mut http = self
            .client
            .post(&self.base_url)
            .header("Content-Type", "application/json")
            .json(&req_body);
        if let Some(key) = &self.api_key {
            http = http.header("Authorization", format!("Bearer {}", key));
        }

        let response = http.send().await.context("LLM HTTP request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("LLM API error {}: {}", status, body);
        }

        let resp_body: OpenAiResponse = response
            .json()
            .await
            .context("Failed to parse LLM response")?;

        let choice = resp_body
            .choices
            .first()
            .context("LLM response has no choices")?;

        let usage = resp_body
            .usage
            .map(|u| UsageMetadata {
                prompt_tokens: u.prompt_tokens.unwrap_or(0),
                completion_tokens: u.completion_tokens.unwrap_or(0),
                total_tokens: u.total_tokens.unwrap_or(0),
            })
            .unwrap_or_default();

        Ok(LlmResponse {
            content: choice.message.content.clone(),
            usage,
            model: resp_body.model.unwrap_or_else(|| self.model.clone()),
        })
    }
}

#[async_trait::async_trait]
impl Summarizer for RemoteLlmProvider {
    async fn summarize(&self, text: &str, params: &GenerationParams) -> Result<String> {
        let prompt = format!(
            r#"Summarize the following news article in plain prose.
Write between {min} and {max} tokens. Keep the original language.
Reply with the summary only, no preamble or formatting.

ARTICLE:
{text}
"#,
            min = params.min_length,
            max = params.max_length,
            text = text
        );

        let request = LlmRequest {
            prompt,
            max_tokens: Some(params.max_length),
            temperature: Some(if params.deterministic { 0.0 } else { 0.7 }),
        };

        let response = self.generate(request).await?;
        let summary = response.content.trim().to_string();
        if summary.is_empty() {
            anyhow::bail!("LLM returned an empty summary");
        }

        debug!(
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            total_tokens = response.usage.total_tokens,
            "summary generated"
        );
        Ok(summary)
    }
}

// OpenAI API request/response structures
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: Option<usize>,
    #[serde(default)]
    completion_tokens: Option<usize>,
    #[serde(default)]
    total_tokens: Option<usize>,
}

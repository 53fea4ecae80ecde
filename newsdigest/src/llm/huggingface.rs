use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{GenerationParams, Summarizer};

/// Summarizer backed by the Hugging Face Inference API (summarization task)
pub struct HuggingFaceSummarizer {
    endpoint: String,
    token: Option<String>,
    default_timeout: Option<Duration>,
    client: reqwest::Client,
}

impl HuggingFaceSummarizer {
    /// `token` may be `None`; requests are then sent without authorization
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token,
            default_timeout: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout_secs: Option<u64>) -> Self {
        self.default_timeout = timeout_secs.map(Duration::from_secs);
        self
    }

    async fn request_summary(&self, text: &str, params: &GenerationParams) -> Result<String> {
        let body = InferenceRequest {
            inputs: text,
            parameters: InferenceParameters {
                max_length: params.max_length,
                min_length: params.min_length,
                do_sample: !params.deterministic,
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("summarization HTTP request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("summarization API error {}: {}", status, body);
        }

        let outputs: Vec<InferenceOutput> = response
            .json()
            .await
            .context("failed to parse summarization response")?;

        let summary = outputs
            .into_iter()
            .next()
            .map(|o| o.summary_text.trim().to_string())
            .context("summarization response has no outputs")?;

        if summary.is_empty() {
            anyhow::bail!("summarization model returned an empty summary");
        }
        Ok(summary)
    }
}

#[async_trait::async_trait]
impl Summarizer for HuggingFaceSummarizer {
    async fn summarize(&self, text: &str, params: &GenerationParams) -> Result<String> {
        // the deadline covers the body as well as the headers
        let summary = match self.default_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.request_summary(text, params))
                .await
                .context("summarization request timed out")??,
            None => self.request_summary(text, params).await?,
        };

        debug!(chars = summary.len(), "summary generated");
        Ok(summary)
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_length: usize,
    min_length: usize,
    do_sample: bool,
}

#[derive(Debug, Deserialize)]
struct InferenceOutput {
    summary_text: String,
}

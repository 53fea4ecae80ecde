use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{FetchError, NewsSource};
use crate::models::{web_link, Article, Query, UNKNOWN_SOURCE};

/// Client for the Newsdata.io "latest news" endpoint.
///
/// Sends `apikey`, `q`, `category`, `language` and `size` as query parameters and
/// decodes the result list into [`Article`]s. The key is never written to logs.
pub struct NewsdataClient {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl NewsdataClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, api_key, None)
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        let mut builder = Client::builder().user_agent("NewsDigest/0.1.0");
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("failed to build reqwest client")?;

        Ok(Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl NewsSource for NewsdataClient {
    async fn fetch(&self, query: &Query) -> Result<Vec<Article>, FetchError> {
        let size = query.max_results().to_string();
        let categories = query.categories().join(",");
        let mut params: Vec<(&str, &str)> = vec![
            ("apikey", self.api_key.as_str()),
            ("q", query.topic()),
            ("language", query.language()),
            ("size", size.as_str()),
        ];
        if !categories.is_empty() {
            params.push(("category", categories.as_str()));
        }

        info!(
            endpoint = %self.endpoint,
            topic = %query.topic(),
            category = %categories,
            language = %query.language(),
            size = query.max_results(),
            "requesting latest news"
        );

        let response = self.client.get(&self.endpoint).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let body = response.text().await?;
        let articles = decode_response(&body)?;
        info!(count = articles.len(), "news API returned articles");
        Ok(articles)
    }
}

/// Decode a Newsdata.io response body. `results` is an article list on success and an
/// error object otherwise, so it is read untyped first.
pub fn decode_response(body: &str) -> Result<Vec<Article>, FetchError> {
    let envelope: NewsdataResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    if envelope.status != "success" {
        let message = envelope
            .results
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| envelope.results.to_string());
        warn!(status = %envelope.status, %message, "news API returned an error status");
        return Err(FetchError::Api(message));
    }

    if envelope.results.is_null() {
        debug!("news API returned no results field");
        return Ok(Vec::new());
    }

    let raw: Vec<RawArticle> = serde_json::from_value(envelope.results)
        .map_err(|e| FetchError::Decode(e.to_string()))?;
    Ok(raw.into_iter().map(Article::from).collect())
}

#[derive(Debug, Deserialize)]
struct NewsdataResponse {
    status: String,
    #[serde(default)]
    results: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    source_name: Option<String>,
    source: Option<RawSource>,
    content: Option<String>,
    description: Option<String>,
    link: Option<String>,
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        let source_name = raw
            .source_name
            .or_else(|| raw.source.and_then(|s| s.name))
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());

        Article {
            title: raw.title.unwrap_or_default(),
            source_name,
            content: raw.content,
            description: raw.description,
            link: web_link(raw.link),
        }
    }
}

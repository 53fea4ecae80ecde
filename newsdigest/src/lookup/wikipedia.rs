use anyhow::{anyhow, Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::{LookupOutcome, TopicLookup};
use crate::models::web_link;

/// Topic lookup against a MediaWiki site (search, then page summary)
pub struct WikipediaClient {
    base_url: Url,
    max_candidates: usize,
    client: Client,
}

impl WikipediaClient {
    pub fn new(base_url: &str, max_candidates: usize, timeout_secs: Option<u64>) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("invalid Wikipedia URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Wikipedia URL cannot be a base: {}", base_url));
        }

        let mut builder = Client::builder().user_agent("NewsDigest/0.1.0");
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            base_url,
            max_candidates,
            client: builder.build().context("failed to build reqwest client")?,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Wikipedia URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn search(&self, query: &str) -> Result<Vec<String>> {
        let url = self.endpoint(&["w", "api.php"])?;
        // one extra so a disambiguation page can be dropped and still fill the list
        let limit = (self.max_candidates + 1).to_string();

        let response = self
            .client
            .get(url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .context("Wikipedia search request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Wikipedia search error {}: {}", status, body);
        }

        let body: SearchResponse = response
            .json()
            .await
            .context("failed to parse Wikipedia search response")?;

        Ok(body
            .query
            .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
            .unwrap_or_default())
    }

    async fn page_summary(&self, title: &str) -> Result<Option<PageSummary>> {
        let page = title.replace(' ', "_");
        let url = self.endpoint(&["api", "rest_v1", "page", "summary", page.as_str()])?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Wikipedia summary request failed")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Wikipedia summary error {}: {}", status, body);
        }

        let summary = response
            .json()
            .await
            .context("failed to parse Wikipedia page summary")?;
        Ok(Some(summary))
    }
}

#[async_trait::async_trait]
impl TopicLookup for WikipediaClient {
    async fn lookup(&self, query: &str) -> Result<LookupOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(LookupOutcome::NotFound);
        }

        let hits = self.search(query).await?;
        debug!(%query, hits = hits.len(), "Wikipedia search finished");
        let Some(top) = hits.first() else {
            info!(%query, "no Wikipedia page found");
            return Ok(LookupOutcome::NotFound);
        };

        let Some(page) = self.page_summary(top).await? else {
            return Ok(LookupOutcome::NotFound);
        };

        if page.kind == "disambiguation" {
            let candidates: Vec<String> = hits
                .iter()
                .filter(|t| **t != page.title && **t != *top)
                .take(self.max_candidates)
                .cloned()
                .collect();
            if candidates.is_empty() {
                info!(%query, "disambiguation page without other search hits");
                return Ok(LookupOutcome::NotFound);
            }
            info!(%query, candidates = candidates.len(), "Wikipedia query is ambiguous");
            return Ok(LookupOutcome::Ambiguous { candidates });
        }

        Ok(LookupOutcome::Found {
            title: page.title,
            summary: page.extract,
            url: web_link(page.content_urls.and_then(|c| c.desktop).and_then(|d| d.page)),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(rename = "type", default)]
    kind: String,
    title: String,
    #[serde(default)]
    extract: String,
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<PageUrl>,
}

#[derive(Debug, Deserialize)]
struct PageUrl {
    page: Option<String>,
}

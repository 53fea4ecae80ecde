//! Fetch, de-duplicate and summarize articles for one query.

use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::llm::summarizer::summarize_article;
use crate::llm::{GenerationParams, Summarizer};
use crate::models::{Article, DigestResult, DigestStatus, Query, SummarizedArticle};
use crate::news::NewsSource;

/// The news digest pipeline. Holds its collaborators; each `run` is independent.
#[derive(Clone)]
pub struct NewsDigestPipeline {
    source: Arc<dyn NewsSource>,
    summarizer: Arc<dyn Summarizer>,
    params: GenerationParams,
    concurrency: usize,
}

impl NewsDigestPipeline {
    pub fn new(source: Arc<dyn NewsSource>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            source,
            summarizer,
            params: GenerationParams::default(),
            concurrency: 1,
        }
    }

    /// Number of summaries requested at once. Output order is unaffected.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Run the pipeline. A failed fetch yields an empty result marked
    /// [`DigestStatus::SourceUnavailable`] instead of an error.
    #[instrument(level = "info", skip_all, fields(topic = %query.topic()))]
    pub async fn run(&self, query: &Query) -> DigestResult {
        let fetched = match self.source.fetch(query).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(error = %e, "news fetch failed; returning empty digest");
                return DigestResult::source_unavailable(e.to_string());
            }
        };

        let fetched_count = fetched.len();
        let articles = dedupe_by_title(fetched);
        info!(
            fetched = fetched_count,
            unique = articles.len(),
            "summarizing articles"
        );

        let summarizer = self.summarizer.as_ref();
        let params = &self.params;
        let summarized: Vec<SummarizedArticle> = stream::iter(articles)
            .map(|article| async move {
                let summary = summarize_article(summarizer, &article, params).await;
                SummarizedArticle { article, summary }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        DigestResult {
            articles: summarized,
            status: DigestStatus::Complete,
        }
    }
}

/// Keep the first article for each exact title, in source order
pub fn dedupe_by_title(articles: Vec<Article>) -> Vec<Article> {
    let mut seen: HashSet<String> = HashSet::new();
    articles
        .into_iter()
        .filter(|article| seen.insert(article.title.clone()))
        .collect()
}

use serde::{Deserialize, Serialize};

/// Source name used when the news API does not report one
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// Upper bound on articles requested per digest
pub const MAX_RESULTS_LIMIT: u32 = 50;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("topic must not be empty")]
    EmptyTopic,
    #[error("language must be a two-letter code, got '{0}'")]
    InvalidLanguage(String),
    #[error("max_results must be between 1 and 50, got {0}")]
    InvalidMaxResults(u32),
}

/// Validated input to one digest run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    topic: String,
    categories: Vec<String>,
    language: String,
    max_results: u32,
}

impl Query {
    pub fn new(
        topic: &str,
        categories: impl IntoIterator<Item = String>,
        language: &str,
        max_results: u32,
    ) -> Result<Self, QueryError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(QueryError::EmptyTopic);
        }

        let language = language.trim().to_ascii_lowercase();
        if language.len() != 2 || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(QueryError::InvalidLanguage(language));
        }

        if !(1..=MAX_RESULTS_LIMIT).contains(&max_results) {
            return Err(QueryError::InvalidMaxResults(max_results));
        }

        let mut unique: Vec<String> = Vec::new();
        for category in categories {
            let category = category.trim().to_string();
            if !category.is_empty() && !unique.contains(&category) {
                unique.push(category);
            }
        }

        Ok(Self {
            topic: topic.to_string(),
            categories: unique,
            language,
            max_results,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Empty means no category filter
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }
}

/// A news article as decoded from the news source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub source_name: String,
    pub content: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

impl Article {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source_name: UNKNOWN_SOURCE.to_string(),
            content: None,
            description: None,
            link: None,
        }
    }

    /// Text fed to the summarizer: content first, then description.
    /// Blank strings count as absent.
    pub fn summarizable_text(&self) -> Option<&str> {
        non_blank(self.content.as_deref()).or_else(|| non_blank(self.description.as_deref()))
    }
}

/// Keep a link only when it is an absolute http(s) URL
pub fn web_link(raw: Option<String>) -> Option<String> {
    let raw = raw?;
    let link = raw.trim();
    let url = url::Url::parse(link).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| link.to_string())
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarizedArticle {
    #[serde(flatten)]
    pub article: Article,
    pub summary: String,
}

/// Whether the news source answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DigestStatus {
    Complete,
    /// The fetch failed; the article list is empty regardless of matches
    SourceUnavailable { reason: String },
}

/// Articles in source order with unique titles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestResult {
    pub articles: Vec<SummarizedArticle>,
    pub status: DigestStatus,
}

impl DigestResult {
    pub fn source_unavailable(reason: impl Into<String>) -> Self {
        Self {
            articles: Vec::new(),
            status: DigestStatus::SourceUnavailable {
                reason: reason.into(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }
}

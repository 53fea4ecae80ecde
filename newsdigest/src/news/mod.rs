use crate::models::{Article, Query};

pub mod newsdata;

/// Failure to obtain articles from the news source
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("news request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("news API returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("news API reported an error: {0}")]
    Api(String),
    #[error("malformed news API response: {0}")]
    Decode(String),
}

/// A remote source of articles for a topic query
#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch candidate articles in the order the source ranks them
    async fn fetch(&self, query: &Query) -> Result<Vec<Article>, FetchError>;
}

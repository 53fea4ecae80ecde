use anyhow::Result;
use serde::Serialize;

pub mod wikipedia;

/// Result of resolving a free-text topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LookupOutcome {
    Found {
        title: String,
        summary: String,
        url: Option<String>,
    },
    /// The query matches several pages; candidate titles to choose from
    Ambiguous { candidates: Vec<String> },
    NotFound,
}

/// Encyclopedia-style topic lookup
#[async_trait::async_trait]
pub trait TopicLookup: Send + Sync {
    /// Transport and decoding failures are errors; ambiguity and absence are outcomes.
    async fn lookup(&self, query: &str) -> Result<LookupOutcome>;
}

// Per-article summarization with fixed fallbacks
use tracing::{info, warn};

use super::{GenerationParams, Summarizer};
use crate::models::Article;

/// Recorded when the model call fails
pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable";
/// Recorded when the article has neither content nor description
pub const NO_CONTENT: &str = "No content available for summarization.";

/// Summarize one article. Never fails: missing text and model errors map to
/// [`NO_CONTENT`] and [`SUMMARY_UNAVAILABLE`].
pub async fn summarize_article<S: Summarizer + ?Sized>(
    summarizer: &S,
    article: &Article,
    params: &GenerationParams,
) -> String {
    let Some(text) = article.summarizable_text() else {
        info!(title = %article.title, "no content to summarize");
        return NO_CONTENT.to_string();
    };

    match summarizer.summarize(text, params).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!(title = %article.title, error = %e, "summarization failed");
            SUMMARY_UNAVAILABLE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::sync::Mutex;

    struct Recording {
        seen: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl Summarizer for Recording {
        async fn summarize(&self, text: &str, _params: &GenerationParams) -> Result<String> {
            self.seen.lock().unwrap().push(text.to_string());
            if self.fail {
                anyhow::bail!("model offline");
            }
            Ok(format!("sum:{}", text))
        }
    }

    fn recording(fail: bool) -> Recording {
        Recording {
            seen: Mutex::new(Vec::new()),
            fail,
        }
    }

    #[tokio::test]
    async fn falls_back_to_description() {
        let s = recording(false);
        let mut article = Article::new("A");
        article.content = Some(String::new());
        article.description = Some("short blurb".into());

        let summary = summarize_article(&s, &article, &GenerationParams::default()).await;

        assert_eq!(summary, "sum:short blurb");
        assert_eq!(*s.seen.lock().unwrap(), vec!["short blurb".to_string()]);
    }

    #[tokio::test]
    async fn no_text_skips_model() {
        let s = recording(false);
        let summary =
            summarize_article(&s, &Article::new("A"), &GenerationParams::default()).await;

        assert_eq!(summary, NO_CONTENT);
        assert!(s.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn model_error_is_unavailable() {
        let s = recording(true);
        let mut article = Article::new("A");
        article.content = Some("body".into());

        let summary = summarize_article(&s, &article, &GenerationParams::default()).await;
        assert_eq!(summary, SUMMARY_UNAVAILABLE);
    }
}

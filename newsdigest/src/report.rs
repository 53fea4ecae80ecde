//! Plain-text rendering of digests and lookups for the terminal.

use std::fmt::Write;

use crate::lookup::LookupOutcome;
use crate::models::DigestResult;

pub const NO_ARTICLES_WARNING: &str =
    "No articles found for the given query. Try adjusting your search terms or filters.";

pub const SEPARATOR: &str = "---";

/// One block per article: title, source, summary, optional link, separator
pub fn render_digest(result: &DigestResult) -> String {
    if result.is_empty() {
        return format!("{}\n", NO_ARTICLES_WARNING);
    }

    let mut out = String::new();
    for entry in &result.articles {
        let _ = writeln!(out, "{}", entry.article.title);
        let _ = writeln!(out, "Source: {}", entry.article.source_name);
        let _ = writeln!(out, "Summary: {}", entry.summary);
        if let Some(link) = &entry.article.link {
            let _ = writeln!(out, "Read more: {}", link);
        }
        let _ = writeln!(out, "{}", SEPARATOR);
    }
    out
}

pub fn render_lookup(query: &str, outcome: &LookupOutcome) -> String {
    match outcome {
        LookupOutcome::Found {
            title,
            summary,
            url,
        } => {
            let mut out = format!("{}\n{}\n", title, summary);
            if let Some(url) = url {
                let _ = writeln!(out, "Read more: {}", url);
            }
            out
        }
        LookupOutcome::Ambiguous { candidates } => {
            let mut out = format!("'{}' may refer to several topics:\n", query);
            for c in candidates {
                let _ = writeln!(out, "  - {}", c);
            }
            out
        }
        LookupOutcome::NotFound => format!("No Wikipedia page found for '{}'.\n", query),
    }
}

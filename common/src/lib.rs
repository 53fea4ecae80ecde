/*!
common/src/lib.rs

Shared configuration types and helpers for News Digest.

This file provides:
- Config data structures (deserialized from TOML), every field optional
- An async loader merging a default file with an override file
- Credential lookup from the process environment
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_NEWS_API_URL: &str = "https://newsdata.io/api/1/latest";
pub const DEFAULT_NEWS_KEY_ENV: &str = "NEWSDATA_API_KEY";
pub const DEFAULT_SUMMARIZER_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";
pub const DEFAULT_SUMMARIZER_TOKEN_ENV: &str = "HUGGINGFACE_API_TOKEN";
pub const DEFAULT_SUMMARIZER_MODEL: &str = "facebook/bart-large-cnn";
pub const DEFAULT_WIKIPEDIA_URL: &str = "https://en.wikipedia.org";

/// HTTP server section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub port: Option<u16>,
}

/// News source (Newsdata.io) section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsConfig {
    pub api_url: Option<String>,
    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,
    pub timeout_seconds: Option<u64>,
    /// Categories offered in the form
    pub categories: Option<Vec<String>>,
    /// Categories preselected in the form
    pub default_categories: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub default_size: Option<u32>,
}

impl NewsConfig {
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_NEWS_API_URL)
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_NEWS_KEY_ENV)
    }

    pub fn categories(&self) -> Vec<String> {
        self.categories.clone().unwrap_or_else(|| {
            to_strings(&["business", "technology", "education", "science"])
        })
    }

    pub fn default_categories(&self) -> Vec<String> {
        self.default_categories
            .clone()
            .unwrap_or_else(|| to_strings(&["business", "technology"]))
    }

    pub fn languages(&self) -> Vec<String> {
        self.languages
            .clone()
            .unwrap_or_else(|| to_strings(&["en", "de", "el"]))
    }

    /// First offered language, "en" when the list is empty
    pub fn default_language(&self) -> String {
        self.languages()
            .into_iter()
            .next()
            .unwrap_or_else(|| "en".to_string())
    }

    pub fn default_size(&self) -> u32 {
        self.default_size.unwrap_or(10)
    }
}

/// Summarization model section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizerConfig {
    /// "huggingface" (default) or "remote" (OpenAI-compatible chat endpoint)
    pub adapter: Option<String>,
    pub api_url: Option<String>,
    pub api_key_env: Option<String>,
    pub model: Option<String>,
    pub timeout_seconds: Option<u64>,
    /// Articles summarized at once within one digest (1 = serial)
    pub concurrency: Option<usize>,
}

impl SummarizerConfig {
    pub fn adapter(&self) -> &str {
        self.adapter.as_deref().unwrap_or("huggingface")
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or(DEFAULT_SUMMARIZER_TOKEN_ENV)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_SUMMARIZER_MODEL)
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency.unwrap_or(1).max(1)
    }
}

/// Wikipedia topic lookup section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupConfig {
    pub enabled: Option<bool>,
    pub base_url: Option<String>,
    pub max_candidates: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

impl LookupConfig {
    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_WIKIPEDIA_URL)
    }

    pub fn max_candidates(&self) -> usize {
        self.max_candidates.unwrap_or(5)
    }
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
}

impl Config {
    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence). Missing files
    /// are skipped, so with neither present the built-in defaults apply.
    pub async fn load_with_defaults(
        default_path: Option<&Path>,
        override_path: Option<&Path>,
    ) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        if let Some(path) = default_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read default config: {}", path.display()))?;
                let val: toml::Value =
                    toml::from_str(&data).context("Failed to parse default configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        if let Some(path) = override_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read override config: {}", path.display()))?;
                let val: toml::Value =
                    toml::from_str(&data).context("Failed to parse override configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        let cfg: Config = config_value
            .try_into()
            .context("Failed to parse merged configuration")?;
        Ok(cfg)
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Read a credential from the environment. Unset and blank values both count as missing.
pub fn resolve_credential(env_name: &str) -> Option<String> {
    std::env::var(env_name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//! Build the pipeline and lookup collaborators from configuration.

use anyhow::{Context, Result};
use common::{resolve_credential, Config, SummarizerConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::llm::huggingface::HuggingFaceSummarizer;
use crate::llm::remote::RemoteLlmProvider;
use crate::llm::Summarizer;
use crate::lookup::wikipedia::WikipediaClient;
use crate::lookup::TopicLookup;
use crate::news::newsdata::NewsdataClient;
use crate::pipeline::NewsDigestPipeline;

/// Shown instead of running the pipeline when the news key is absent
pub const MISSING_NEWS_KEY: &str = "Newsdata API key is missing. Please check your .env file.";

/// Shipped defaults, read from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.default.toml";
/// Local overrides picked up when `--config` is not given
pub const OVERRIDE_CONFIG_FILE: &str = "config.toml";

/// Load `.env` into the process environment when one is present.
pub fn load_dotenv() {
    match dotenv::dotenv() {
        Ok(path) => info!(path = ?path, ".env file loaded"),
        Err(_) => info!("no .env file loaded; using process environment only"),
    }
}

/// Load `config.default.toml` merged with the override file from `dir`.
/// An explicit `--config` path must exist; the implicit `config.toml` is optional.
pub async fn load_config(dir: &Path, explicit: Option<PathBuf>) -> Result<Config> {
    let default_path = dir.join(DEFAULT_CONFIG_FILE);

    let override_path = match explicit {
        Some(p) => {
            if !p.exists() {
                error!(path = ?p, "specified config file not found");
                anyhow::bail!("Config file not found: {}", p.display());
            }
            Some(p)
        }
        None => Some(dir.join(OVERRIDE_CONFIG_FILE)).filter(|p| p.exists()),
    };

    let config = Config::load_with_defaults(
        default_path.exists().then_some(default_path.as_path()),
        override_path.as_deref(),
    )
    .await?;
    info!(default = ?default_path, override = ?override_path, "configuration loaded");
    Ok(config)
}

/// Collaborators shared by the HTTP server and the CLI
#[derive(Clone, Default)]
pub struct Services {
    /// `None` when the news source credential is missing
    pub pipeline: Option<Arc<NewsDigestPipeline>>,
    /// `None` when lookup is disabled
    pub lookup: Option<Arc<dyn TopicLookup>>,
    /// Blocking configuration problems to show the user
    pub errors: Vec<String>,
}

/// Create the summarizer selected by `summarizer.adapter`
pub fn create_summarizer(cfg: &SummarizerConfig) -> Result<Box<dyn Summarizer>> {
    let token = resolve_credential(cfg.api_key_env());
    if token.is_none() {
        warn!(
            env = cfg.api_key_env(),
            "summarizer token not set; sending unauthenticated requests"
        );
    }

    match cfg.adapter() {
        "huggingface" => {
            let endpoint = cfg
                .api_url
                .clone()
                .unwrap_or_else(|| common::DEFAULT_SUMMARIZER_URL.to_string());
            info!(%endpoint, "summarizer: Hugging Face inference");
            Ok(Box::new(
                HuggingFaceSummarizer::new(endpoint, token).with_timeout(cfg.timeout_seconds),
            ))
        }
        "remote" => {
            let api_url = cfg
                .api_url
                .clone()
                .unwrap_or_else(|| "http://localhost:11434/v1/chat/completions".to_string());
            info!(%api_url, model = cfg.model(), "summarizer: OpenAI-compatible endpoint");
            Ok(Box::new(
                RemoteLlmProvider::new(api_url, token, cfg.model())
                    .with_timeout(cfg.timeout_seconds.unwrap_or(30)),
            ))
        }
        other => anyhow::bail!("Unknown summarizer adapter type: {}", other),
    }
}

/// Wire up everything the configuration describes. A missing news key is recorded
/// in [`Services::errors`] rather than returned as an error.
pub fn build_services(config: &Config) -> Result<Services> {
    let mut services = Services::default();

    let summarizer: Arc<dyn Summarizer> = Arc::from(create_summarizer(&config.summarizer)?);

    match resolve_credential(config.news.api_key_env()) {
        Some(api_key) => {
            let source = NewsdataClient::with_timeout(
                config.news.api_url(),
                api_key,
                config.news.timeout_seconds,
            )?;
            let pipeline = NewsDigestPipeline::new(Arc::new(source), summarizer)
                .with_concurrency(config.summarizer.concurrency());
            services.pipeline = Some(Arc::new(pipeline));
        }
        None => {
            error!(env = config.news.api_key_env(), "news API key is missing");
            services.errors.push(MISSING_NEWS_KEY.to_string());
        }
    }

    if config.lookup.enabled() {
        let client = WikipediaClient::new(
            config.lookup.base_url(),
            config.lookup.max_candidates(),
            config.lookup.timeout_seconds,
        )
        .context("failed to configure Wikipedia lookup")?;
        services.lookup = Some(Arc::new(client));
    }

    Ok(services)
}

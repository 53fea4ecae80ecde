use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use common::Config;
use rocket::figment::Figment;
use rocket::fs::{relative, FileServer};
use rocket::http::Status;
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::{get, post, routes, Build, Rocket, State};
use serde::{Deserialize, Serialize};

use crate::bootstrap::Services;
use crate::lookup::LookupOutcome;
use crate::models::{DigestResult, Query, MAX_RESULTS_LIMIT};
use crate::report::NO_ARTICLES_WARNING;

/// Application state stored inside Rocket managed state.
#[derive(Clone)]
pub struct AppState {
    pub started_at: DateTime<Utc>,
    pub config: Arc<Config>,
    pub services: Services,
}

impl AppState {
    pub fn new(config: Arc<Config>, services: Services) -> Self {
        Self {
            started_at: Utc::now(),
            config,
            services,
        }
    }
}

/// Response structure for `/api/v1/status`; also feeds the form choices.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    uptime_seconds: i64,
    news_source_configured: bool,
    lookup_enabled: bool,
    summarizer: String,
    errors: Vec<String>,
    categories: Vec<String>,
    default_categories: Vec<String>,
    languages: Vec<String>,
    default_size: u32,
    max_results: u32,
}

/// Request body for `/api/v1/digest`. Omitted filters take the configured defaults.
#[derive(Deserialize)]
struct DigestRequest {
    topic: String,
    categories: Option<Vec<String>>,
    language: Option<String>,
    size: Option<u32>,
}

#[derive(Serialize)]
struct DigestResponse {
    #[serde(flatten)]
    result: DigestResult,
    /// Set when no article came back, whatever the reason
    warning: Option<&'static str>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

type ApiError = (Status, Json<ErrorBody>);

fn api_error(status: Status, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// Redirect root to static index.html
#[get("/")]
async fn index_redirect() -> Redirect {
    Redirect::to("/static/index.html")
}

#[get("/health")]
async fn health() -> &'static str {
    "OK"
}

#[get("/api/v1/status")]
async fn status(state: &State<AppState>) -> Json<StatusResponse> {
    let uptime = (Utc::now() - state.started_at).num_seconds();
    let news = &state.config.news;

    Json(StatusResponse {
        status: if state.services.errors.is_empty() { "ok" } else { "degraded" },
        uptime_seconds: uptime,
        news_source_configured: state.services.pipeline.is_some(),
        lookup_enabled: state.services.lookup.is_some(),
        summarizer: state.config.summarizer.adapter().to_string(),
        errors: state.services.errors.clone(),
        categories: news.categories(),
        default_categories: news.default_categories(),
        languages: news.languages(),
        default_size: news.default_size(),
        max_results: MAX_RESULTS_LIMIT,
    })
}

/// Run the digest pipeline for a topic.
#[post("/api/v1/digest", data = "<body>")]
async fn digest(
    state: &State<AppState>,
    body: Json<DigestRequest>,
) -> Result<Json<DigestResponse>, ApiError> {
    let Some(pipeline) = state.services.pipeline.clone() else {
        let message = state
            .services
            .errors
            .first()
            .cloned()
            .unwrap_or_else(|| "news source is not configured".to_string());
        return Err(api_error(Status::ServiceUnavailable, message));
    };

    let news = &state.config.news;
    let body = body.into_inner();

    let categories = body.categories.unwrap_or_else(|| news.default_categories());
    let offered = news.categories();
    if let Some(unknown) = categories.iter().find(|c| !offered.contains(*c)) {
        return Err(api_error(
            Status::BadRequest,
            format!("unknown category '{}'", unknown),
        ));
    }

    let language = body.language.unwrap_or_else(|| news.default_language());
    let size = body.size.unwrap_or_else(|| news.default_size());

    let query = Query::new(&body.topic, categories, &language, size)
        .map_err(|e| api_error(Status::BadRequest, e.to_string()))?;

    let result = pipeline.run(&query).await;
    let warning = result.is_empty().then_some(NO_ARTICLES_WARNING);
    tracing::info!(
        topic = %query.topic(),
        articles = result.len(),
        "digest served"
    );

    Ok(Json(DigestResponse { result, warning }))
}

/// Resolve a topic against Wikipedia.
#[get("/api/v1/lookup?<q>")]
async fn topic_lookup(state: &State<AppState>, q: &str) -> Result<Json<LookupOutcome>, ApiError> {
    let Some(lookup) = state.services.lookup.clone() else {
        return Err(api_error(Status::NotFound, "topic lookup is disabled"));
    };

    lookup.lookup(q).await.map(Json).map_err(|e| {
        tracing::error!(query = %q, error = %e, "topic lookup failed");
        api_error(Status::BadGateway, format!("lookup failed: {}", e))
    })
}

/// Assemble the Rocket instance with managed state and all routes mounted.
pub fn build_rocket(state: AppState, figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .manage(state)
        .mount(
            "/",
            routes![index_redirect, health, status, digest, topic_lookup],
        )
        .mount("/static", FileServer::from(relative!("static")))
}

/// Launch the HTTP server; blocks until Rocket shuts down.
///
/// `server.bind` and `server.port` from the configuration override Rocket's own
/// defaults (and `ROCKET_*` environment variables).
pub async fn launch_rocket(config: Arc<Config>, services: Services) -> Result<()> {
    let mut fig = rocket::Config::figment();
    if let Some(bind) = &config.server.bind {
        fig = fig.merge(("address", bind.clone()));
    }
    if let Some(port) = config.server.port {
        fig = fig.merge(("port", port));
    }

    let state = AppState::new(config, services);

    tracing::info!("Starting Rocket HTTP server");
    build_rocket(state, fig)
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    tracing::info!("Rocket HTTP server has shut down");
    Ok(())
}

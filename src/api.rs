//! HTTP API serving upvoted articles to the browse UI.
//!
//! # Routes
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /api/upvoted-articles?userId=<id>` | Scrape the forum now and return every upvoted topic |
//! | `GET /api/articles?q=<query>&limit=<n>` | Return the saved article array, optionally filtered |
//!
//! A scrape answers with a JSON array of `{title, url, description?}`. The
//! saved route returns its entries exactly as stored, extra fields included.
//! Errors are `{error, details?}` with 400, 502, or 500 (see [`ApiError`]).
//!
//! Every scrape request runs its own aggregation; nothing is cached between
//! requests.

use crate::config::{ScrapeConfig, Settings};
use crate::errors::{ApiError, ScrapeError};
use crate::models::Article;
use crate::scrapers::aggregate::aggregate_all;
use crate::scrapers::extract::Extractor;
use crate::scrapers::fetcher::PageFetcher;
use crate::search::{filter_articles, window};
use crate::store::{ArticleSource, load_articles};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

/// Shared, read-only state behind every request.
#[derive(Debug)]
pub struct AppContext {
    fetcher: PageFetcher,
    extractor: Extractor,
    config: ScrapeConfig,
    default_user_id: Option<String>,
    store: Option<ArticleSource>,
    client: Client,
}

pub type AppState = Arc<AppContext>;

impl AppContext {
    pub fn new(settings: &Settings) -> Result<Self, ScrapeError> {
        let config = settings.scrape_config()?;
        let client = Client::builder().build()?;
        let store = settings
            .store
            .as_deref()
            .map(ArticleSource::parse)
            .transpose()?;
        Ok(Self {
            fetcher: PageFetcher::with_client(client.clone(), &config),
            extractor: Extractor::new(settings.scheme, &config.origin())?,
            default_user_id: settings.default_user_id.clone(),
            config,
            store,
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpvotedParams {
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SavedParams {
    q: Option<String>,
    limit: Option<usize>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/upvoted-articles", get(upvoted_articles))
        .route("/api/articles", get(saved_articles))
        .with_state(state)
}

/// Bind `addr` and serve until the process stops.
#[instrument(level = "info", skip(state))]
pub async fn serve(state: AppState, addr: &str) -> Result<(), Box<dyn Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "API listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[instrument(level = "info", skip(state))]
async fn upvoted_articles(
    State(state): State<AppState>,
    Query(params): Query<UpvotedParams>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let user_id = params
        .user_id
        .filter(|id| !id.trim().is_empty())
        .or_else(|| state.default_user_id.clone())
        .ok_or(ApiError::MissingParameter("userId"))?;

    let run = aggregate_all(&state.fetcher, &state.extractor, &state.config, &user_id)
        .await
        .map_err(|e| {
            error!(%user_id, error = %e, "Scrape failed");
            ApiError::from(e)
        })?;

    info!(
        %user_id,
        count = run.articles.len(),
        pages = run.pages_fetched,
        stop = %run.stop,
        "Serving upvoted articles"
    );
    Ok(Json(run.articles))
}

#[instrument(level = "info", skip(state))]
async fn saved_articles(
    State(state): State<AppState>,
    Query(params): Query<SavedParams>,
) -> Result<impl IntoResponse, ApiError> {
    let articles = match &state.store {
        Some(source) => load_articles(&state.client, source).await.map_err(|e| {
            error!(%source, error = %e, "Reading saved articles failed");
            ApiError::from(e)
        })?,
        None => Vec::new(),
    };

    let matched: Vec<&Value> = match params.q.as_deref() {
        Some(q) => filter_articles(&articles, q),
        None => articles.iter().collect(),
    };
    let (shown, has_more) = window(&matched, params.limit.unwrap_or(usize::MAX));
    let body: Vec<Value> = shown.iter().map(|entry| (*entry).clone()).collect();

    Ok((
        [
            ("x-total-count", matched.len().to_string()),
            ("x-has-more", has_more.to_string()),
        ],
        Json(body),
    ))
}

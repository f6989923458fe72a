//! Read path for a previously saved article array.
//!
//! The array can live in a local JSON file or behind an http(s) URL. A
//! source that does not exist yet reads as an empty array so the UI can
//! show its "no data yet" state instead of an error.
//!
//! Entries are kept as raw JSON values. The saved file may carry fields this
//! crate never writes (ids, dates), and they are served back unchanged.

use crate::errors::ScrapeError;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument, warn};
use url::Url;

/// Where saved articles are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleSource {
    File(PathBuf),
    Remote(Url),
}

impl ArticleSource {
    /// `http://` and `https://` strings are remote; anything else is a path.
    pub fn parse(raw: &str) -> Result<Self, ScrapeError> {
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(ArticleSource::Remote(Url::parse(raw)?))
        } else {
            Ok(ArticleSource::File(PathBuf::from(raw)))
        }
    }
}

impl fmt::Display for ArticleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleSource::File(path) => write!(f, "{}", path.display()),
            ArticleSource::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// Load the saved article array from `source`.
///
/// # Arguments
///
/// * `client` - HTTP client used for remote sources
/// * `source` - Local file or http(s) URL holding the array
///
/// # Returns
///
/// Every entry of the array as it was saved. A missing file, or a remote
/// that answers 404, yields `[]`.
///
/// # Errors
///
/// * [`ScrapeError::Status`] for any other non-2xx remote answer
/// * [`ScrapeError::Transport`] or [`ScrapeError::Io`] when the read fails
/// * [`ScrapeError::Json`] when the content is not a JSON array
#[instrument(level = "info", skip(client, source), fields(%source))]
pub async fn load_articles(
    client: &Client,
    source: &ArticleSource,
) -> Result<Vec<Value>, ScrapeError> {
    let raw = match source {
        ArticleSource::File(path) => match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Article file not found; serving empty list");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        },
        ArticleSource::Remote(url) => {
            let response = client.get(url.clone()).send().await?;
            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                warn!("Remote article list not found; serving empty list");
                return Ok(Vec::new());
            }
            if !status.is_success() {
                return Err(ScrapeError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or_default().to_string(),
                });
            }
            response.text().await?
        }
    };

    let articles: Vec<Value> = serde_json::from_str(&raw)?;
    info!(count = articles.len(), "Loaded saved articles");
    Ok(articles)
}

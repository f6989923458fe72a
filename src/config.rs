//! Runtime settings: defaults, optional YAML file, and the scrape configuration.
//!
//! Settings are resolved in three layers. Built-in defaults come first, then
//! an optional YAML file, then command-line flags (see [`crate::cli`]).
//!
//! ```yaml
//! base_url: https://news.hada.io
//! page_size: 15
//! max_pages: 50
//! page_delay_ms: 100
//! scheme: topic-link
//! ```

use crate::errors::ScrapeError;
use crate::scrapers::extract::MarkupScheme;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://news.hada.io";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7";

/// File-backed settings with serde defaults for every field.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Origin of the forum being scraped.
    pub base_url: String,
    /// Number of topics on a full listing page.
    pub page_size: usize,
    /// Highest page number that will ever be requested.
    pub max_pages: u32,
    /// Pause between consecutive page fetches.
    pub page_delay_ms: u64,
    pub user_agent: String,
    pub accept_language: String,
    /// Which listing markup the extractor expects.
    pub scheme: MarkupScheme,
    /// User scraped when the API request carries no `userId`.
    pub default_user_id: Option<String>,
    /// Address the HTTP API binds to.
    pub bind: String,
    /// Saved article array (local path or http(s) URL) for the read path.
    pub store: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: 15,
            max_pages: 50,
            page_delay_ms: 100,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            scheme: MarkupScheme::default(),
            default_user_id: None,
            bind: "127.0.0.1:3000".to_string(),
            store: None,
        }
    }
}

impl Settings {
    /// Build the pagination configuration, validating the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Url`] if `base_url` does not parse.
    pub fn scrape_config(&self) -> Result<ScrapeConfig, ScrapeError> {
        Ok(ScrapeConfig {
            base_url: Url::parse(&self.base_url)?,
            page_size: self.page_size,
            max_pages: self.max_pages,
            page_delay: Duration::from_millis(self.page_delay_ms),
            user_agent: self.user_agent.clone(),
            accept_language: self.accept_language.clone(),
        })
    }
}

/// Load settings from an optional YAML file.
///
/// # Arguments
///
/// * `path` - Optional path to a YAML settings file
///
/// # Returns
///
/// The defaults when `path` is `None`, otherwise the file's settings with
/// missing keys filled from the defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML for
/// [`Settings`].
#[instrument(level = "info")]
pub async fn load_settings(path: Option<&str>) -> Result<Settings, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let raw = fs::read_to_string(path).await?;
    let settings: Settings = serde_yaml::from_str(&raw)?;
    info!(path, "Loaded settings file");
    Ok(settings)
}

/// Everything the fetcher and aggregator need for one run.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: Url,
    pub page_size: usize,
    pub max_pages: u32,
    pub page_delay: Duration,
    pub user_agent: String,
    pub accept_language: String,
}

impl ScrapeConfig {
    /// Scheme, host and port of the base URL without a trailing slash.
    pub fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }
}

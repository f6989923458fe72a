//! JSON output for a finished aggregation run.
//!
//! The file holds a bare array of `{title, url, description?}` objects, the
//! same shape the read path in [`crate::store`] loads and the API serves.

use crate::models::Article;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `articles` as a pretty-printed JSON array to `path`.
///
/// Parent directories are created as needed. Non-ASCII titles are written
/// as-is rather than escaped.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = articles.len()))]
pub async fn write_articles(articles: &[Article], path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(articles)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create output dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!("Wrote article JSON");
    Ok(())
}

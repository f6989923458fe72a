//! # upvote_scrape
//!
//! Collects a GeekNews user's upvoted topics by walking the paginated
//! `upvoted_topics` listing, and serves them as a JSON array for a
//! search/browse UI.
//!
//! ## Usage
//!
//! ```sh
//! upvote_scrape scrape -u laeyoung -o data/upvoted.json
//! upvote_scrape serve --store data/upvoted.json
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: Download one listing page at a time with browser-like headers
//! 2. **Extraction**: Parse each page into `{title, url, description?}` records
//! 3. **Aggregation**: Deduplicate by URL and stop on an empty or short page,
//!    or at the page ceiling
//! 4. **Output**: Write the array to a JSON file, or return it from the HTTP API

use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod errors;
mod models;
mod outputs;
mod scrapers;
mod search;
mod store;
mod utils;

#[cfg(test)]
mod testing;

use cli::{Cli, Command};
use config::{Settings, load_settings};
use outputs::json;
use scrapers::aggregate::aggregate_all;
use scrapers::extract::Extractor;
use scrapers::fetcher::PageFetcher;
use utils::{ensure_writable_dir, sort_by_topic_id};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("upvote_scrape starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut settings = load_settings(args.config.as_deref()).await?;
    args.overrides.apply(&mut settings);
    debug!(?settings, "Resolved settings");

    match args.command {
        Command::Scrape {
            user_id,
            output,
            sort_by_id,
        } => {
            run_scrape(&settings, &user_id, Path::new(&output), sort_by_id).await?;
        }
        Command::Serve {
            bind,
            default_user_id,
            store,
        } => {
            if let Some(bind) = bind {
                settings.bind = bind;
            }
            if default_user_id.is_some() {
                settings.default_user_id = default_user_id;
            }
            if store.is_some() {
                settings.store = store;
            }
            let state = Arc::new(api::AppContext::new(&settings)?);
            api::serve(state, &settings.bind).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

/// One aggregation run written to `output`.
#[instrument(level = "info", skip(settings, output), fields(output = %output.display()))]
async fn run_scrape(
    settings: &Settings,
    user_id: &str,
    output: &Path,
    sort_by_id: bool,
) -> Result<(), Box<dyn Error>> {
    // Early check: fail before scraping if the output can't be written
    let out_dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    if let Err(e) = ensure_writable_dir(out_dir).await {
        error!(
            path = %out_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let config = settings.scrape_config()?;
    let fetcher = PageFetcher::new(&config)?;
    let extractor = Extractor::new(settings.scheme, &config.origin())?;

    let run = aggregate_all(&fetcher, &extractor, &config, user_id).await?;
    info!(
        count = run.articles.len(),
        pages = run.pages_fetched,
        stop = %run.stop,
        "Scrape complete"
    );

    let articles = if sort_by_id {
        sort_by_topic_id(run.articles)
    } else {
        run.articles
    };
    json::write_articles(&articles, output).await?;
    Ok(())
}

//! Sequential pagination over a user's upvoted topics.
//!
//! The forum does not say whether another page exists, so the sweep infers
//! the end of the listing from each page's size:
//!
//! ```text
//! FETCHING(page = 1)
//!   ├─ 0 articles                 -> DONE (EmptyPage)
//!   ├─ append unseen URLs
//!   ├─ count < page_size          -> DONE (ShortPage)
//!   ├─ page >= max_pages          -> DONE (PageLimit)
//!   └─ sleep(page_delay), page+1  -> FETCHING
//! ```
//!
//! Any fetch error aborts the sweep and nothing collected so far is returned.

use crate::config::ScrapeConfig;
use crate::errors::ScrapeError;
use crate::models::{AggregationRun, Article, StopReason};
use crate::scrapers::extract::Extractor;
use crate::scrapers::fetcher::FetchPage;
use crate::utils::truncate_for_log;
use std::collections::HashSet;
use std::time::Instant;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument};

/// Walk pages `1..=max_pages` for `user_id` and collect unique articles.
///
/// Articles are deduplicated by URL; the first occurrence keeps its
/// position. Pages are fetched one at a time with `page_delay` in between.
///
/// # Errors
///
/// Returns the first fetch error encountered. No partial result is kept.
#[instrument(
    level = "info",
    skip(fetcher, extractor, config),
    fields(page_size = config.page_size, max_pages = config.max_pages)
)]
pub async fn aggregate_all<F: FetchPage>(
    fetcher: &F,
    extractor: &Extractor,
    config: &ScrapeConfig,
    user_id: &str,
) -> Result<AggregationRun, ScrapeError> {
    let t0 = Instant::now();
    let mut collected: Vec<Article> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    if config.max_pages == 0 {
        return Ok(AggregationRun {
            articles: collected,
            pages_fetched: 0,
            stop: StopReason::PageLimit { page: 0 },
        });
    }

    let mut page: u32 = 1;
    let stop = loop {
        let html = match fetcher.fetch_page(user_id, page).await {
            Ok(html) => html,
            Err(e) => {
                error!(page, error = %e, "Page fetch failed; aborting run");
                return Err(e);
            }
        };

        let articles = extractor.parse(&html, page);
        let count = articles.len();
        if count == 0 && page == 1 {
            debug!(preview = %truncate_for_log(&html, 300), "First page listed no topics");
        }
        let added = append_unique(&mut collected, &mut seen, articles);
        info!(page, count, added, total = collected.len(), "Collected page");

        if let Some(stop) = stop_signal(page, count, config) {
            break stop;
        }

        page += 1;
        sleep(config.page_delay).await;
    };

    info!(
        %stop,
        pages = page,
        total = collected.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Aggregation finished"
    );

    Ok(AggregationRun {
        articles: collected,
        pages_fetched: page,
        stop,
    })
}

/// Decide whether the sweep ends after `page`, which parsed to `count` articles.
///
/// The empty-page and short-page checks are evaluated independently; the
/// page ceiling applies only when the page itself looked full.
pub fn stop_signal(page: u32, count: usize, config: &ScrapeConfig) -> Option<StopReason> {
    if count == 0 {
        Some(StopReason::EmptyPage { page })
    } else if count < config.page_size {
        Some(StopReason::ShortPage { page, count })
    } else if page >= config.max_pages {
        Some(StopReason::PageLimit { page })
    } else {
        None
    }
}

/// Append articles whose URL has not been seen. Returns how many were added.
fn append_unique(
    collected: &mut Vec<Article>,
    seen: &mut HashSet<String>,
    articles: Vec<Article>,
) -> usize {
    let before = collected.len();
    for article in articles {
        if seen.insert(article.url.clone()) {
            collected.push(article);
        }
    }
    collected.len() - before
}

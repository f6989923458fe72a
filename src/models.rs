//! Data models for scraped upvoted topics and aggregation runs.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: One upvoted topic as extracted from a listing page
//! - [`StopReason`]: Why an aggregation run stopped paginating
//! - [`AggregationRun`]: The deduplicated result of one pagination sweep
//!
//! `Article` is the only data contract shared with the browse UI, so its JSON
//! shape is kept to `{title, url, description?}`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single upvoted topic.
///
/// Articles are created by the extractor and never mutated afterwards. The
/// `url` is the identity key used for deduplication within one result set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    /// The topic title with any trailing comment count removed.
    pub title: String,
    /// Absolute URL of the topic.
    pub url: String,
    /// Short description shown under the title, when the markup carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Article {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.is_empty());
        self
    }

    /// Numeric topic id from a `...?id=N` URL, if present.
    ///
    /// For example: `"https://news.hada.io/topic?id=42"` -> `Some(42)`
    pub fn topic_id(&self) -> Option<u64> {
        let parsed = url::Url::parse(&self.url).ok()?;
        parsed
            .query_pairs()
            .find(|(k, _)| k == "id")
            .and_then(|(_, v)| v.parse().ok())
    }
}

/// Why the aggregator stopped requesting further pages.
///
/// The upstream site exposes no "has next page" field, so the end of the
/// listing is inferred from the size of each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The page parsed to zero articles.
    EmptyPage { page: u32 },
    /// The page held fewer articles than a full page.
    ShortPage { page: u32, count: usize },
    /// The configured page ceiling was reached.
    PageLimit { page: u32 },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EmptyPage { page } => write!(f, "empty page {page}"),
            StopReason::ShortPage { page, count } => {
                write!(f, "short page {page} ({count} articles)")
            }
            StopReason::PageLimit { page } => write!(f, "page limit reached at page {page}"),
        }
    }
}

/// The outcome of one complete pagination sweep for a single user.
#[derive(Debug)]
pub struct AggregationRun {
    /// Unique articles in page-then-position order.
    pub articles: Vec<Article>,
    /// Number of pages requested from upstream.
    pub pages_fetched: u32,
    /// The signal that ended the sweep.
    pub stop: StopReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_omitted_when_absent() {
        let article = Article::new("Cool Post", "https://news.hada.io/topic?id=1");
        let json = serde_json::to_string(&article).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Cool Post","url":"https://news.hada.io/topic?id=1"}"#
        );
    }

    #[test]
    fn test_deserialize_without_description() {
        let json = r#"[{"title":"A","url":"https://news.hada.io/topic?id=2"}]"#;
        let articles: Vec<Article> = serde_json::from_str(json).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].description, None);
    }

    #[test]
    fn test_empty_description_is_dropped() {
        let article = Article::new("A", "https://x.test/a").with_description(Some(String::new()));
        assert_eq!(article.description, None);
    }

    #[test]
    fn test_topic_id() {
        let article = Article::new("A", "https://news.hada.io/topic?id=12345");
        assert_eq!(article.topic_id(), Some(12345));

        let article = Article::new("B", "https://example.com/post/9");
        assert_eq!(article.topic_id(), None);
    }

    #[test]
    fn test_stop_reason_display() {
        let reason = StopReason::ShortPage { page: 2, count: 4 };
        assert_eq!(reason.to_string(), "short page 2 (4 articles)");
    }
}

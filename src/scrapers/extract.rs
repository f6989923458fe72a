//! Listing-page extraction.
//!
//! The forum's markup has changed several times, so everything that knows
//! about selectors lives here behind [`Extractor::parse`]. Supporting a new
//! layout means adding a [`MarkupScheme`] variant and its row handler.
//!
//! # Schemes
//!
//! | Scheme | Rows | Title | URL |
//! |--------|------|-------|-----|
//! | `topic-link` | `.topic_row` | `div.topictitle a` text | anchor `href`, normalised |
//! | `topic-id` | `div.topic_row` | `.topictitle h1` text | `/topic?id=N` from the row or vote id |

use crate::errors::ScrapeError;
use crate::models::Article;
use clap::ValueEnum;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

static RE_COMMENT_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(\d+\)$").unwrap());

/// Listing layouts the extractor understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MarkupScheme {
    /// Title anchor inside `div.topictitle`; the link target is the article URL.
    #[default]
    TopicLink,
    /// Topic id from the row (`topic_row<ID>`) or vote counter (`vote<ID>`),
    /// title from the heading, plus the topic description.
    TopicId,
}

/// Turns one listing page into [`Article`]s.
#[derive(Debug)]
pub struct Extractor {
    scheme: MarkupScheme,
    origin: String,
    row: Selector,
    title: Selector,
    vote: Selector,
    description: Selector,
}

impl Extractor {
    /// Build an extractor for `scheme`, resolving links against `origin`.
    pub fn new(scheme: MarkupScheme, origin: &str) -> Result<Self, ScrapeError> {
        let (row, title) = match scheme {
            MarkupScheme::TopicLink => (".topic_row", "div.topictitle a"),
            MarkupScheme::TopicId => ("div.topic_row", ".topictitle h1"),
        };
        Ok(Self {
            scheme,
            origin: origin.trim_end_matches('/').to_string(),
            row: selector(row)?,
            title: selector(title)?,
            vote: selector(r#".vote span[id^="vote"]"#)?,
            description: selector(".topicdesc")?,
        })
    }

    /// Extract articles in document order.
    ///
    /// Rows missing a title or link are logged and skipped. An empty vector
    /// means the page listed nothing.
    #[instrument(level = "debug", skip(self, html), fields(scheme = ?self.scheme))]
    pub fn parse(&self, html: &str, page: u32) -> Vec<Article> {
        let document = Html::parse_document(html);
        let mut articles = Vec::new();

        for (position, row) in document.select(&self.row).enumerate() {
            let extracted = match self.scheme {
                MarkupScheme::TopicLink => self.topic_link_row(row),
                MarkupScheme::TopicId => self.topic_id_row(row),
            };
            match extracted {
                Ok(article) => articles.push(article),
                Err(missing) => warn!(page, position, missing, "Skipping row"),
            }
        }

        debug!(page, count = articles.len(), "Parsed listing page");
        articles
    }

    fn topic_link_row(&self, row: ElementRef<'_>) -> Result<Article, &'static str> {
        let anchor = row.select(&self.title).next().ok_or("title anchor")?;
        let title = clean_title(&anchor.text().collect::<String>());
        if title.is_empty() {
            return Err("title");
        }
        let href = anchor
            .value()
            .attr("href")
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or("href")?;
        Ok(Article::new(title, normalize_url(&self.origin, href)))
    }

    fn topic_id_row(&self, row: ElementRef<'_>) -> Result<Article, &'static str> {
        let id = row
            .value()
            .id()
            .and_then(|id| id.strip_prefix("topic_row"))
            .and_then(|n| n.parse::<u64>().ok())
            .or_else(|| {
                row.select(&self.vote)
                    .next()
                    .and_then(|span| span.value().id())
                    .and_then(|id| id.strip_prefix("vote"))
                    .and_then(|n| n.parse::<u64>().ok())
            })
            .ok_or("topic id")?;

        let title = row
            .select(&self.title)
            .next()
            .map(|h| clean_title(&element_text(h)))
            .filter(|t| !t.is_empty())
            .ok_or("title")?;

        let description = row.select(&self.description).next().map(element_text);

        Ok(
            Article::new(title, format!("{}/topic?id={id}", self.origin))
                .with_description(description),
        )
    }
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(format!("{css}: {e:?}")))
}

/// All text below `element`, whitespace collapsed.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).join(" ")
}

/// Trim a title and drop a trailing comment count.
///
/// `"Cool Post (12)"` -> `"Cool Post"`
pub fn clean_title(raw: &str) -> String {
    RE_COMMENT_COUNT.replace(raw.trim(), "").trim().to_string()
}

/// Make `href` absolute against `origin`.
///
/// Absolute links are kept, root-relative links are prefixed with the origin,
/// anything else is joined to the origin with a single slash.
pub fn normalize_url(origin: &str, href: &str) -> String {
    let origin = origin.trim_end_matches('/');
    if href.starts_with("http") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{origin}{href}")
    } else {
        format!("{origin}/{href}")
    }
}

/// HTML builders shared by the scraper tests.
#[cfg(test)]
pub(crate) mod fixtures {
    /// A `topic-link` listing page with one row per `(title, href)`.
    pub fn topic_link_page(rows: &[(String, String)]) -> String {
        let body: String = rows
            .iter()
            .map(|(title, href)| {
                format!(
                    r#"<div class="topic_row"><div class="vote"></div><div class="topictitle"><a href="{href}" rel="nofollow">{title}</a></div><div class="topicinfo">by someone</div></div>"#
                )
            })
            .collect();
        format!("<html><body><div class=\"topics\">{body}</div></body></html>")
    }

    /// `count` rows linking to `/topic?id=start..`.
    pub fn numbered_page(start: usize, count: usize) -> String {
        let rows: Vec<(String, String)> = (start..start + count)
            .map(|i| (format!("Topic {i} ({i})"), format!("/topic?id={i}")))
            .collect();
        topic_link_page(&rows)
    }
}

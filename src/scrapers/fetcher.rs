//! Listing page fetcher.
//!
//! One GET per page against `{base}/upvoted_topics?userid=<id>&page=<n>`,
//! with browser-like headers. There is no retry and no timeout beyond the
//! client default; a failed page is reported to the caller as-is.

use crate::config::ScrapeConfig;
use crate::errors::ScrapeError;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Source of raw listing HTML.
///
/// The aggregator only depends on this trait, so tests can feed it pages
/// without a network.
pub trait FetchPage {
    /// Fetch the HTML of listing page `page` for `user_id`.
    ///
    /// # Returns
    ///
    /// The raw response body.
    ///
    /// # Errors
    ///
    /// * [`ScrapeError::Status`] when the upstream answers with a non-2xx status
    /// * [`ScrapeError::Transport`] when the request or body read fails
    async fn fetch_page(&self, user_id: &str, page: u32) -> Result<String, ScrapeError>;
}

/// [`FetchPage`] over HTTP with a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    origin: String,
    user_agent: String,
    accept_language: String,
}

impl PageFetcher {
    /// Build a fetcher with its own client.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Transport`] if the TLS backend cannot be
    /// initialised.
    pub fn new(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing client (and its connection pool).
    pub fn with_client(client: Client, config: &ScrapeConfig) -> Self {
        Self {
            client,
            origin: config.origin(),
            user_agent: config.user_agent.clone(),
            accept_language: config.accept_language.clone(),
        }
    }

    /// Listing URL for one page of a user's upvotes.
    ///
    /// # Arguments
    ///
    /// * `user_id` - Forum user id, percent-encoded into the query
    /// * `page` - 1-based page number
    ///
    /// # Returns
    ///
    /// `{origin}/upvoted_topics?userid={user_id}&page={page}`
    pub fn page_url(&self, user_id: &str, page: u32) -> String {
        format!(
            "{}/upvoted_topics?userid={}&page={}",
            self.origin,
            urlencoding::encode(user_id),
            page
        )
    }
}

impl FetchPage for PageFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch_page(&self, user_id: &str, page: u32) -> Result<String, ScrapeError> {
        let url = self.page_url(user_id, page);
        let t0 = Instant::now();
        info!(%url, "Fetching page");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Upstream returned an error status");
            return Err(ScrapeError::Status {
                url,
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let html = response.text().await?;
        debug!(
            bytes = html.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::testing::FakeForum;

    fn config_for(origin: &str) -> ScrapeConfig {
        Settings {
            base_url: origin.to_string(),
            ..Settings::default()
        }
        .scrape_config()
        .unwrap()
    }

    #[test]
    fn test_page_url_encodes_user_id() {
        let fetcher = PageFetcher::new(&config_for("https://news.hada.io/")).unwrap();
        assert_eq!(
            fetcher.page_url("laeyoung", 3),
            "https://news.hada.io/upvoted_topics?userid=laeyoung&page=3"
        );
        assert_eq!(
            fetcher.page_url("a b&c", 1),
            "https://news.hada.io/upvoted_topics?userid=a%20b%26c&page=1"
        );
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let forum = FakeForum::new();
        forum.set_page(1, 200, "<html>page one</html>");
        let origin = forum.spawn().await;

        let fetcher = PageFetcher::new(&config_for(&origin)).unwrap();
        let html = fetcher.fetch_page("alice", 1).await.unwrap();
        assert_eq!(html, "<html>page one</html>");

        let requests = forum.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].user_id, "alice");
        assert_eq!(requests[0].page, 1);
        assert!(requests[0].user_agent.starts_with("Mozilla/5.0"));
        assert!(requests[0].accept.starts_with("text/html"));
        assert_eq!(requests[0].accept_language, crate::config::DEFAULT_ACCEPT_LANGUAGE);
    }

    #[tokio::test]
    async fn test_fetch_reports_status_and_reason() {
        let forum = FakeForum::new();
        forum.set_page(2, 503, "busy");
        let origin = forum.spawn().await;

        let fetcher = PageFetcher::new(&config_for(&origin)).unwrap();
        match fetcher.fetch_page("alice", 2).await {
            Err(ScrapeError::Status {
                url,
                status,
                reason,
            }) => {
                assert_eq!(status, 503);
                assert_eq!(reason, "Service Unavailable");
                assert!(url.ends_with("/upvoted_topics?userid=alice&page=2"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = PageFetcher::new(&config_for(&format!("http://{addr}"))).unwrap();
        let err = fetcher.fetch_page("alice", 1).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Transport(_)));
        assert!(err.is_upstream());
    }
}

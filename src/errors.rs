//! Error types for scraping, the read path, and the HTTP API.
//!
//! [`ScrapeError`] covers everything below the aggregator. [`ApiError`] is the
//! taxonomy surfaced to HTTP callers; every `ScrapeError` maps onto exactly one
//! `ApiError` variant.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Failures while fetching or reading article data.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Upstream answered with a non-success status.
    #[error("failed to fetch {url}: {status} {reason}")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    /// The request never produced a response (DNS, connect, body read).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid CSS selector: {0}")]
    Selector(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ScrapeError {
    /// Whether the failure originated at the upstream site.
    pub fn is_upstream(&self) -> bool {
        matches!(self, ScrapeError::Status { .. } | ScrapeError::Transport(_))
    }
}

/// Errors returned by the HTTP API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing {0} query parameter")]
    MissingParameter(&'static str),

    #[error("Failed to fetch upvoted articles")]
    UpstreamFetchFailure(#[source] ScrapeError),

    #[error("Internal error")]
    Internal(#[source] ScrapeError),
}

impl From<ScrapeError> for ApiError {
    fn from(e: ScrapeError) -> Self {
        if e.is_upstream() {
            ApiError::UpstreamFetchFailure(e)
        } else {
            ApiError::Internal(e)
        }
    }
}

/// JSON body for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::UpstreamFetchFailure(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let details = match self {
            ApiError::MissingParameter(_) => None,
            ApiError::UpstreamFetchFailure(e) | ApiError::Internal(e) => Some(e.to_string()),
        };
        ErrorBody {
            error: self.to_string(),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

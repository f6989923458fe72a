//! A local stand-in for the forum, served by axum on an ephemeral port.

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One request the fake forum received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub user_id: String,
    pub page: u32,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
}

/// Pages keyed by number; unknown pages answer 200 with an empty listing.
#[derive(Clone, Default)]
pub struct FakeForum {
    pages: Arc<Mutex<HashMap<u32, (u16, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeForum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_page(&self, page: u32, status: u16, body: impl Into<String>) {
        self.pages.lock().unwrap().insert(page, (status, body.into()));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.requests().iter().map(|r| r.page).collect()
    }

    /// Serve on `127.0.0.1:0` and return the origin, e.g. `http://127.0.0.1:41234`.
    pub async fn spawn(&self) -> String {
        let router = Router::new()
            .route("/upvoted_topics", get(upvoted_topics))
            .with_state(self.clone());
        serve(router).await
    }
}

/// Run `router` on an ephemeral loopback port and return its origin.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn upvoted_topics(
    State(forum): State<FakeForum>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    let page = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(0);

    forum.requests.lock().unwrap().push(RecordedRequest {
        user_id: params.get("userid").cloned().unwrap_or_default(),
        page,
        user_agent: header("user-agent"),
        accept: header("accept"),
        accept_language: header("accept-language"),
    });

    let (status, body) = forum
        .pages
        .lock()
        .unwrap()
        .get(&page)
        .cloned()
        .unwrap_or((200, "<html><body></body></html>".to_string()));
    (StatusCode::from_u16(status).unwrap(), body)
}

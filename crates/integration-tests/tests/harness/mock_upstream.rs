//! Mock inference endpoint for integration tests
//!
//! Records every request it receives and answers with a scripted status and
//! raw body text, so tests can exercise double-encoded and non-JSON replies.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::{Router, routing};
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

/// One request as seen by the mock upstream
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

impl RecordedRequest {
    /// Header value as a string, if present
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Mock scoring endpoint with a scripted reply
pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockUpstreamState>,
}

struct MockUpstreamState {
    requests: Mutex<Vec<RecordedRequest>>,
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
}

impl MockUpstream {
    /// Start a mock that answers 200 with a try-on style result
    pub async fn start() -> anyhow::Result<Self> {
        let body = serde_json::json!({
            "result_image": "aGVsbG8gd29ybGQ=",
            "garment_attributes": { "type": "shirt", "color": "blue" }
        });
        Self::start_inner(StatusCode::OK, body.to_string(), None).await
    }

    /// Start a mock that answers `status` with a JSON body
    pub async fn start_json(status: u16, body: &serde_json::Value) -> anyhow::Result<Self> {
        Self::start_inner(StatusCode::from_u16(status)?, body.to_string(), None).await
    }

    /// Start a mock that answers `status` with arbitrary body text
    pub async fn start_raw(status: u16, body: &str) -> anyhow::Result<Self> {
        Self::start_inner(StatusCode::from_u16(status)?, body.to_owned(), None).await
    }

    /// Start a mock that waits `delay` before answering 200
    pub async fn start_slow(delay: Duration) -> anyhow::Result<Self> {
        Self::start_inner(StatusCode::OK, "{}".to_owned(), Some(delay)).await
    }

    async fn start_inner(status: StatusCode, body: String, delay: Option<Duration>) -> anyhow::Result<Self> {
        let state = Arc::new(MockUpstreamState {
            requests: Mutex::new(Vec::new()),
            status,
            body,
            delay,
        });

        let app = Router::new()
            .route("/score", routing::post(handle_score))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Scoring URL to configure as the relay upstream
    pub fn url(&self) -> String {
        format!("http://{}/score", self.addr)
    }

    /// Number of requests received
    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// The only request received; panics unless exactly one arrived
    pub fn single_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one upstream request");
        requests.into_iter().next().unwrap()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// URL of a port nothing is listening on
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/score")
}

async fn handle_score(
    State(state): State<Arc<MockUpstreamState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    state.requests.lock().unwrap().push(RecordedRequest { headers, body });

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}

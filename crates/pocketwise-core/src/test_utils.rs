//! Test utilities for pocketwise-core
//!
//! A mock LLM server that speaks both the OpenAI chat completions API and the
//! Ollama generate API, with a fixed status, body and optional delay.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::sync::oneshot;

/// How the mock server answers completion requests
#[derive(Debug, Clone)]
pub struct MockBehavior {
    pub status: u16,
    /// Completion text, wrapped in the endpoint's JSON envelope
    pub reply: Option<String>,
    /// Raw body returned as-is, takes precedence over `reply`
    pub raw_body: Option<String>,
    pub delay: Option<Duration>,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            status: 200,
            reply: None,
            raw_body: None,
            delay: None,
        }
    }
}

#[derive(Clone)]
struct ServerState {
    behavior: Arc<MockBehavior>,
    requests: Arc<AtomicUsize>,
}

/// Mock LLM server for testing
pub struct MockLlmServer {
    addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockLlmServer {
    /// Start the mock server on an available port
    pub async fn start(behavior: MockBehavior) -> Self {
        let requests = Arc::new(AtomicUsize::new(0));
        let state = ServerState {
            behavior: Arc::new(behavior),
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/v1/chat/completions", post(handle_chat))
            .route("/v1/models", get(handle_models))
            .route("/api/generate", post(handle_generate))
            .route("/api/tags", get(handle_tags))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Server that answers every completion with `text`
    pub async fn with_reply(text: &str) -> Self {
        Self::start(MockBehavior {
            reply: Some(text.to_string()),
            ..Default::default()
        })
        .await
    }

    /// Server that fails every completion with `status`
    pub async fn with_status(status: u16, body: &str) -> Self {
        Self::start(MockBehavior {
            status,
            raw_body: Some(body.to_string()),
            ..Default::default()
        })
        .await
    }

    /// Server that returns `body` verbatim with a 200
    pub async fn with_raw_body(body: &str) -> Self {
        Self::start(MockBehavior {
            raw_body: Some(body.to_string()),
            ..Default::default()
        })
        .await
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of completion requests received
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockLlmServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn respond<F>(state: &ServerState, envelope: F) -> Response
where
    F: FnOnce(&str) -> serde_json::Value,
{
    state.requests.fetch_add(1, Ordering::SeqCst);
    let behavior = &state.behavior;

    if let Some(delay) = behavior.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(behavior.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = match (&behavior.raw_body, &behavior.reply) {
        (Some(raw), _) => raw.clone(),
        (None, Some(reply)) => envelope(reply).to_string(),
        (None, None) => envelope("").to_string(),
    };

    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// OpenAI chat completions endpoint
async fn handle_chat(State(state): State<ServerState>) -> Response {
    respond(&state, |reply| {
        json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": reply},
                "finish_reason": "stop"
            }]
        })
    })
    .await
}

/// Ollama generate endpoint
async fn handle_generate(State(state): State<ServerState>) -> Response {
    respond(&state, |reply| {
        json!({"model": "mock", "response": reply, "done": true})
    })
    .await
}

async fn handle_models() -> Json<serde_json::Value> {
    Json(json!({"object": "list", "data": [{"id": "mock", "object": "model"}]}))
}

async fn handle_tags() -> Json<serde_json::Value> {
    Json(json!({"models": [{"name": "mock:latest"}]}))
}

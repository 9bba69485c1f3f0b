//! Mock inference backend for integration tests
//!
//! Speaks both the Ollama generate API and the OpenAI-compatible chat API,
//! so one instance can stand in for a local engine or a cloud vendor.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Mock backend that returns predictable completions
pub struct MockBackend {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    generate_count: AtomicU32,
    chat_count: AtomicU32,
    /// Generation requests to fail with 500 before succeeding
    fail_count: AtomicU32,
    /// Delay before answering a generation request
    delay: Duration,
    last_prompt: Mutex<Option<String>>,
    last_chat: Mutex<Option<serde_json::Value>>,
    last_authorization: Mutex<Option<String>>,
}

impl MockBackend {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(MockState::default()).await
    }

    /// Start a mock that fails the first `n` generation requests with 500
    ///
    /// Probe and listing endpoints keep answering normally.
    pub async fn start_failing(n: u32) -> anyhow::Result<Self> {
        Self::start_inner(MockState {
            fail_count: AtomicU32::new(n),
            ..MockState::default()
        })
        .await
    }

    /// Start a mock that waits `delay` before every generation response
    pub async fn start_slow(delay: Duration) -> anyhow::Result<Self> {
        Self::start_inner(MockState {
            delay,
            ..MockState::default()
        })
        .await
    }

    async fn start_inner(state: MockState) -> anyhow::Result<Self> {
        let state = Arc::new(state);

        let app = Router::new()
            .route("/api/generate", routing::post(handle_generate))
            .route("/api/tags", routing::get(handle_tags))
            .route("/v1/chat/completions", routing::post(handle_chat))
            .route("/v1/models", routing::get(handle_models))
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

    /// Root URL, as configured for a local engine
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Base URL including `/v1`, as configured for a cloud vendor
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of `/api/generate` requests received
    pub fn generate_count(&self) -> u32 {
        self.state.generate_count.load(Ordering::Relaxed)
    }

    /// Number of `/v1/chat/completions` requests received
    pub fn chat_count(&self) -> u32 {
        self.state.chat_count.load(Ordering::Relaxed)
    }

    /// Prompt of the most recent `/api/generate` request
    pub fn last_prompt(&self) -> Option<String> {
        self.state.last_prompt.lock().unwrap().clone()
    }

    /// Body of the most recent chat request
    pub fn last_chat(&self) -> Option<serde_json::Value> {
        self.state.last_chat.lock().unwrap().clone()
    }

    /// `Authorization` header of the most recent chat request
    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().unwrap().clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[allow(dead_code)]
    role: String,
    #[allow(dead_code)]
    content: String,
}

/// Consume one pending failure, if any
async fn should_fail(state: &MockState) -> bool {
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    state
        .fail_count
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
        .is_ok()
}

fn failure() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": {
                "message": "mock server intentional failure",
                "type": "server_error"
            }
        })),
    )
        .into_response()
}

async fn handle_generate(State(state): State<Arc<MockState>>, Json(req): Json<GenerateRequest>) -> impl IntoResponse {
    state.generate_count.fetch_add(1, Ordering::Relaxed);
    *state.last_prompt.lock().unwrap() = Some(req.prompt.clone());

    if should_fail(&state).await {
        return failure();
    }

    Json(serde_json::json!({
        "model": req.model,
        "response": format!("ollama {} answered", req.model),
        "done": true,
        "prompt_eval_count": 26,
        "eval_count": 14
    }))
    .into_response()
}

async fn handle_chat(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    state.chat_count.fetch_add(1, Ordering::Relaxed);
    *state.last_authorization.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    *state.last_chat.lock().unwrap() = Some(body.clone());

    if should_fail(&state).await {
        return failure();
    }

    let Ok(req) = serde_json::from_value::<ChatRequest>(body) else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };

    Json(serde_json::json!({
        "id": "chatcmpl-test-123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": req.model,
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": format!("{} answered {} messages", req.model, req.messages.len())
            },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": 1500,
            "completion_tokens": 500,
            "total_tokens": 2000
        }
    }))
    .into_response()
}

async fn handle_tags() -> impl IntoResponse {
    Json(serde_json::json!({
        "models": [
            { "name": "llama3.1:latest" },
            { "name": "qwen2.5:latest" }
        ]
    }))
}

async fn handle_models() -> impl IntoResponse {
    Json(serde_json::json!({
        "object": "list",
        "data": [{ "id": "llama3.1", "object": "model", "owned_by": "local" }]
    }))
}

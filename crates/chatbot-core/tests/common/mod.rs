//! Mock OpenAI-compatible model service for integration tests.

// Shared by several test binaries, each using a subset.
#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chatbot_core::config::{ProbeSettings, Settings};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedCompletion {
    pub authorization: Option<String>,
    pub body: Value,
}

/// One scripted answer from `/v1/chat/completions`.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Status(StatusCode),
    /// Sent verbatim with a 200.
    Body(Value),
}

impl From<Result<String, StatusCode>> for Reply {
    fn from(reply: Result<String, StatusCode>) -> Self {
        match reply {
            Ok(text) => Reply::Text(text),
            Err(status) => Reply::Status(status),
        }
    }
}

#[derive(Clone)]
struct MockState {
    model_statuses: Arc<Mutex<VecDeque<StatusCode>>>,
    models_fallback: StatusCode,
    model_hits: Arc<AtomicUsize>,
    replies: Arc<Mutex<VecDeque<Reply>>>,
    completions: Arc<Mutex<Vec<RecordedCompletion>>>,
}

async fn models_handler(State(state): State<MockState>) -> Response {
    state.model_hits.fetch_add(1, Ordering::SeqCst);
    let status = state
        .model_statuses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or(state.models_fallback);
    if status.is_success() {
        (status, Json(json!({"object": "list", "data": [{"id": "mock-model"}]}))).into_response()
    } else {
        status.into_response()
    }
}

async fn completions_handler(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.completions.lock().unwrap().push(RecordedCompletion {
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    match state.replies.lock().unwrap().pop_front() {
        Some(Reply::Text(text)) => Json(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        }))
        .into_response(),
        Some(Reply::Status(status)) => (status, "mock failure").into_response(),
        Some(Reply::Body(body)) => Json(body).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "no replies left").into_response(),
    }
}

pub struct MockBackend {
    addr: SocketAddr,
    state: MockState,
}

impl MockBackend {
    /// `/v1/models` answers with each status in turn, then `models_fallback`.
    pub async fn start(
        model_statuses: Vec<StatusCode>,
        models_fallback: StatusCode,
        replies: Vec<Result<String, StatusCode>>,
    ) -> Self {
        let state = MockState {
            model_statuses: Arc::new(Mutex::new(model_statuses.into())),
            models_fallback,
            model_hits: Arc::new(AtomicUsize::new(0)),
            replies: Arc::new(Mutex::new(replies.into_iter().map(Reply::from).collect())),
            completions: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/v1/models", get(models_handler))
            .route("/v1/chat/completions", post(completions_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// A backend that is up immediately and answers with `replies`.
    pub async fn ready(replies: Vec<&str>) -> Self {
        Self::start(
            Vec::new(),
            StatusCode::OK,
            replies.into_iter().map(|r| Ok(r.to_string())).collect(),
        )
        .await
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn model_hits(&self) -> usize {
        self.state.model_hits.load(Ordering::SeqCst)
    }

    pub fn completions(&self) -> Vec<RecordedCompletion> {
        self.state.completions.lock().unwrap().clone()
    }

    pub fn push_reply(&self, reply: Reply) {
        self.state.replies.lock().unwrap().push_back(reply);
    }

    pub fn settings(&self) -> Settings {
        settings_for(&self.url())
    }
}

/// Settings with a fast probe schedule pointed at `url`.
pub fn settings_for(url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.endpoint.base_url = url.to_string();
    settings.probe = fast_probe();
    settings.model.request_timeout_secs = 5;
    settings
}

pub fn fast_probe() -> ProbeSettings {
    ProbeSettings {
        max_attempts: 5,
        initial_delay_ms: 5,
        max_delay_ms: 20,
        multiplier: 2.0,
        max_elapsed_secs: 10,
        request_timeout_ms: 500,
    }
}

/// An address nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

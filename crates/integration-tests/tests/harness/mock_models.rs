//! Mock model backends for integration tests
//!
//! Serves an OpenAI-compatible language model and image API plus a music
//! backend, all returning canned output.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use base64::Engine;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

pub const TAGS: &str = "rap, male vocal, soulful, 100 bpm, drums, bass";
pub const LYRICS: &str = "[verse]\nCity lights and a heavy beat\nSoul on the corner of a midnight street\n\n[chorus]\nWe keep it moving, we keep it real";
pub const CATEGORIES: &str = "Hip Hop, Soul, Rap";
pub const WAV_BYTES: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt ";
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Mock model server with request recording
pub struct MockModels {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    llm_count: AtomicU32,
    music_count: AtomicU32,
    image_count: AtomicU32,
    fail_images: AtomicBool,
    fail_music: AtomicBool,
    reject_llm_key: AtomicBool,
    instructions: Mutex<Vec<String>>,
    music_requests: Mutex<Vec<serde_json::Value>>,
    image_requests: Mutex<Vec<serde_json::Value>>,
}

impl MockModels {
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(MockState::default());

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .route("/v1/completions", routing::post(handle_completions))
            .route("/v1/images/generations", routing::post(handle_images))
            .route("/music/generate", routing::post(handle_music))
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

    /// Base URL of the OpenAI-compatible API (language model and images)
    pub fn llm_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Base URL of the music backend
    pub fn music_url(&self) -> String {
        format!("http://{}/music", self.addr)
    }

    pub fn fail_images(&self) {
        self.state.fail_images.store(true, Ordering::Relaxed);
    }

    pub fn fail_music(&self) {
        self.state.fail_music.store(true, Ordering::Relaxed);
    }

    /// Make the language model answer 401 as if the API key were wrong
    pub fn reject_llm_key(&self) {
        self.state.reject_llm_key.store(true, Ordering::Relaxed);
    }

    pub fn llm_count(&self) -> u32 {
        self.state.llm_count.load(Ordering::Relaxed)
    }

    pub fn music_count(&self) -> u32 {
        self.state.music_count.load(Ordering::Relaxed)
    }

    pub fn image_count(&self) -> u32 {
        self.state.image_count.load(Ordering::Relaxed)
    }

    /// Instructions received by the language model, in order
    pub fn instructions(&self) -> Vec<String> {
        self.state.instructions.lock().unwrap().clone()
    }

    /// JSON bodies received by the music backend, in order
    pub fn music_requests(&self) -> Vec<serde_json::Value> {
        self.state.music_requests.lock().unwrap().clone()
    }

    /// JSON bodies received by the image API, in order
    pub fn image_requests(&self) -> Vec<serde_json::Value> {
        self.state.image_requests.lock().unwrap().clone()
    }
}

impl Drop for MockModels {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Pick a canned answer from the instruction text
fn reply_for(instruction: &str) -> &'static str {
    if instruction.contains("audio tags") {
        TAGS
    } else if instruction.contains("genres or categories") {
        CATEGORIES
    } else {
        LYRICS
    }
}

#[derive(Deserialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

async fn handle_chat_completions(State(state): State<Arc<MockState>>, Json(request): Json<ChatRequest>) -> Response {
    state.llm_count.fetch_add(1, Ordering::Relaxed);

    if state.reject_llm_key.load(Ordering::Relaxed) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": { "message": "Incorrect API key provided: sk-mock" } })),
        )
            .into_response();
    }

    let instruction = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
    let reply = reply_for(&instruction);
    state.instructions.lock().unwrap().push(instruction);

    Json(serde_json::json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": "Qwen/Qwen2-7B-Instruct",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": reply },
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}

#[derive(Deserialize)]
struct CompletionRequest {
    prompt: String,
    #[serde(default)]
    echo: bool,
}

async fn handle_completions(State(state): State<Arc<MockState>>, Json(request): Json<CompletionRequest>) -> Response {
    state.llm_count.fetch_add(1, Ordering::Relaxed);

    let reply = reply_for(&request.prompt);
    let text = if request.echo {
        format!("{}{reply}", request.prompt)
    } else {
        reply.to_owned()
    };
    state.instructions.lock().unwrap().push(request.prompt);

    Json(serde_json::json!({
        "id": "cmpl-mock",
        "object": "text_completion",
        "choices": [{ "index": 0, "text": text, "finish_reason": "stop" }]
    }))
    .into_response()
}

async fn handle_music(State(state): State<Arc<MockState>>, Json(body): Json<serde_json::Value>) -> Response {
    state.music_count.fetch_add(1, Ordering::Relaxed);
    state.music_requests.lock().unwrap().push(body);

    if state.fail_music.load(Ordering::Relaxed) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "CUDA out of memory").into_response();
    }

    ([(axum::http::header::CONTENT_TYPE, "audio/wav")], WAV_BYTES).into_response()
}

async fn handle_images(State(state): State<Arc<MockState>>, Json(body): Json<serde_json::Value>) -> Response {
    state.image_count.fetch_add(1, Ordering::Relaxed);
    state.image_requests.lock().unwrap().push(body);

    if state.fail_images.load(Ordering::Relaxed) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": { "message": "pipeline crashed" } })),
        )
            .into_response();
    }

    Json(serde_json::json!({
        "created": 0,
        "data": [{ "b64_json": base64::engine::general_purpose::STANDARD.encode(PNG_BYTES) }]
    }))
    .into_response()
}

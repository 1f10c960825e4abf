use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use pdfchat_ingest::embedding::{Embedder, EmbeddingError};
use pdfchat_llm::{AnswerGenerator, LlmError, LlmProvider, Message};
use pdfchat_server::{build_router, AppState};

pub const DIMS: usize = 64;
const BOUNDARY: &str = "pdfchat-test-boundary";

// ── Fake embedder ─────────────────────────────────────────────────

/// Hashed bag-of-words vectors: texts sharing words are close.
pub struct BagOfWordsEmbedder {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl BagOfWordsEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }
}

pub fn bag_of_words(text: &str) -> Vec<f32> {
    let mut v = vec![0.0; DIMS];
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let word = word.to_lowercase();
        let bucket = word
            .bytes()
            .fold(2166136261u32, |h, b| (h ^ b as u32).wrapping_mul(16777619));
        v[bucket as usize % DIMS] += 1.0;
    }
    v
}

#[async_trait]
impl Embedder for BagOfWordsEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EmbeddingError::Api("503 Service Unavailable: try again later".into()));
        }
        Ok(texts.iter().map(|t| bag_of_words(t)).collect())
    }

    fn dimensions(&self) -> usize {
        DIMS
    }

    fn model_name(&self) -> &str {
        "bag-of-words"
    }
}

// ── Fake chat model ───────────────────────────────────────────────

/// Answers with the context section of the prompt, and records prompts.
pub struct ContextEchoLlm {
    pub prompts: Mutex<Vec<String>>,
    pub fail: bool,
}

impl ContextEchoLlm {
    pub fn new() -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl LlmProvider for ContextEchoLlm {
    async fn complete(
        &self,
        messages: Vec<Message>,
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<String, LlmError> {
        let prompt = messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.prompts.lock().unwrap().push(prompt.clone());

        if self.fail {
            return Err(LlmError::ApiError {
                status: 429,
                body: "Resource has been exhausted".into(),
            });
        }

        let context = prompt
            .split_once("Context: ")
            .and_then(|(_, rest)| rest.split_once("\nQuestion:"))
            .map(|(ctx, _)| ctx.to_string())
            .unwrap_or_default();
        Ok(format!("Based on the documents: {context}"))
    }

    fn model_name(&self) -> &str {
        "context-echo"
    }
}

// ── App under test ────────────────────────────────────────────────

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub embedder: Arc<BagOfWordsEmbedder>,
    pub llm: Arc<ContextEchoLlm>,
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(BagOfWordsEmbedder::new(), ContextEchoLlm::new())
    }

    pub fn with(embedder: BagOfWordsEmbedder, llm: ContextEchoLlm) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let embedder = Arc::new(embedder);
        let llm = Arc::new(llm);
        let mut state = AppState::new(
            dir.path().join("faiss_index/index.msgpack"),
            embedder.clone(),
            AnswerGenerator::new(llm.clone()),
        );
        state.staging_dir = dir.path().join("staging");
        std::fs::create_dir_all(&state.staging_dir).unwrap();
        let state = Arc::new(state);
        Self {
            router: build_router(state.clone()),
            state,
            embedder,
            llm,
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn upload(&self, files: &[(&str, &[u8])]) -> (StatusCode, Value) {
        let parts: Vec<(&str, &str, &[u8])> =
            files.iter().map(|(name, bytes)| ("files[]", *name, *bytes)).collect();
        self.send(multipart_request(&parts)).await
    }

    /// Upload directories still present under the staging dir.
    pub fn staged_dirs(&self) -> usize {
        std::fs::read_dir(&self.state.staging_dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("pdfchat-upload-"))
            .count()
    }

    pub async fn ask(&self, question: &str) -> (StatusCode, Value) {
        let body = serde_json::json!({ "question": question }).to_string();
        self.send(ask_request(&body)).await
    }
}

// ── Requests ──────────────────────────────────────────────────────

/// `POST /upload` with `(field name, filename, content)` parts.
pub fn multipart_request(parts: &[(&str, &str, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (field, filename, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// `POST /ask` with a raw body.
pub fn ask_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/ask")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn error_message(json: &Value) -> &str {
    json["error"].as_str().unwrap_or_default()
}

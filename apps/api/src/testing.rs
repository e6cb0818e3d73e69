//! In-process fakes for every external collaborator in `AppState`.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use serde_json::Value;
use tower::ServiceExt;

use crate::auth::{AuthError, TokenVerifier};
use crate::config::{Config, PredictionSettings};
use crate::errors::AppError;
use crate::events::{AnalysisRecorded, EventPublisher};
use crate::llm_client::{LlmError, PredictionBackend};
use crate::models::signal::{Sentence, Sentiment, TextSignal};
use crate::nlp_client::{NlpBackend, NlpError};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::DocumentArchive;
use crate::store::memory::MemoryStore;

pub const TEST_TOKEN: &str = "valid-token";
pub const TEST_USER: &str = "user-1";

// ────────────────────────────────────────────────────────────────────────────
// NLP
// ────────────────────────────────────────────────────────────────────────────

/// Returns canned signals per exact text. Unknown text gets a neutral signal
/// with one sentence per `.`-terminated chunk.
#[derive(Default)]
pub struct FakeNlp {
    signals: HashMap<String, TextSignal>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeNlp {
    pub fn with_signal(mut self, text: &str, signal: TextSignal) -> Self {
        self.signals.insert(text.to_string(), signal);
        self
    }

    pub fn with_document_sentiment(self, text: &str, score: f64) -> Self {
        let signal = TextSignal {
            sentiment: Sentiment {
                score,
                magnitude: score.abs(),
            },
            ..Default::default()
        };
        self.with_signal(text, signal)
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    /// Every call waits this long before answering or failing.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NlpBackend for FakeNlp {
    async fn analyze(&self, text: &str) -> Result<TextSignal, NlpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(text) {
            return Err(NlpError::Api {
                status: 429,
                message: "Quota exceeded".to_string(),
            });
        }
        Ok(self.signals.get(text).cloned().unwrap_or_else(|| TextSignal {
            sentences: text
                .split_terminator('.')
                .filter(|s| !s.trim().is_empty())
                .map(|s| Sentence {
                    text: s.trim().to_string(),
                    sentiment: Sentiment::default(),
                })
                .collect(),
            ..Default::default()
        }))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prediction
// ────────────────────────────────────────────────────────────────────────────

/// Answers every prompt with the same text and remembers the prompts.
pub struct FakeLlm {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for FakeLlm {
    fn default() -> Self {
        Self::replying("Focus on one customer segment first.")
    }
}

#[async_trait]
impl PredictionBackend for FakeLlm {
    async fn predict(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().ok_or(LlmError::Api {
            status: 503,
            message: "Service unavailable".to_string(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Identity, archive, events
// ────────────────────────────────────────────────────────────────────────────

/// Accepts only `TEST_TOKEN`, resolving it to `TEST_USER`.
pub struct StaticVerifier;

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<String, AuthError> {
        if token == TEST_TOKEN {
            Ok(TEST_USER.to_string())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArchivedObject {
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
}

#[derive(Default)]
pub struct RecordingArchive {
    objects: Mutex<Vec<ArchivedObject>>,
}

impl RecordingArchive {
    pub fn objects(&self) -> Vec<ArchivedObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentArchive for RecordingArchive {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError> {
        self.objects.lock().unwrap().push(ArchivedObject {
            key: key.to_string(),
            body,
            content_type: content_type.to_string(),
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingEvents {
    fail: bool,
    published: Mutex<Vec<AnalysisRecorded>>,
}

impl RecordingEvents {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn published(&self) -> Vec<AnalysisRecorded> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingEvents {
    async fn publish(&self, event: &AnalysisRecorded) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("redis unavailable");
        }
        self.published.lock().unwrap().push(event.clone());
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Harness
// ────────────────────────────────────────────────────────────────────────────

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/test".into(),
        redis_url: "redis://localhost".into(),
        events_channel: "analysis-events".into(),
        s3_bucket: "test-bucket".into(),
        s3_endpoint: "http://localhost:9000".into(),
        aws_access_key_id: "test".into(),
        aws_secret_access_key: "test".into(),
        nlp_endpoint: "http://localhost:1".into(),
        nlp_api_key: "test".into(),
        prediction_endpoint: "http://localhost:2".into(),
        prediction_access_token: "test".into(),
        prediction: PredictionSettings::default(),
        identity_endpoint: "http://localhost:3".into(),
        identity_api_key: "test".into(),
        max_upload_bytes: 1024,
        port: 0,
        rust_log: "debug".into(),
    }
}

/// A full router wired to fakes, with handles kept for assertions.
pub struct TestApp {
    pub nlp: Arc<FakeNlp>,
    pub llm: Arc<FakeLlm>,
    pub store: Arc<MemoryStore>,
    pub archive: Arc<RecordingArchive>,
    pub events: Arc<RecordingEvents>,
    pub router: Router,
}

impl TestApp {
    pub fn new(nlp: FakeNlp, llm: FakeLlm) -> Self {
        Self::with_store(nlp, llm, MemoryStore::default())
    }

    pub fn with_store(nlp: FakeNlp, llm: FakeLlm, store: MemoryStore) -> Self {
        let nlp = Arc::new(nlp);
        let llm = Arc::new(llm);
        let store = Arc::new(store);
        let archive = Arc::new(RecordingArchive::default());
        let events = Arc::new(RecordingEvents::default());

        let state = AppState {
            nlp: nlp.clone(),
            llm: llm.clone(),
            store: store.clone(),
            archive: archive.clone(),
            events: events.clone(),
            verifier: Arc::new(StaticVerifier),
            config: test_config(),
        };

        Self {
            nlp,
            llm,
            store,
            archive,
            events,
            router: build_router(state),
        }
    }

    /// Sends a request and returns the status plus the JSON body (`Null` when empty).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(authed_json(uri, body)).await
    }
}

pub fn authed_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

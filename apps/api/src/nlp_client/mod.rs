/// NLP client: the single point of entry for natural-language analysis calls.
///
/// One `documents:annotateText` request per text returns sentiment, entities,
/// sentence breakdown and (for long enough texts) content categories, which
/// are normalized into a `TextSignal`.
///
/// No retries and no caching: a failed call surfaces immediately, and
/// identical text analysed twice hits the backend twice.
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::models::signal::{ContentCategory, Entity, Sentence, TextSignal};

mod wire;

use wire::{AnnotateRequest, AnnotateResponse, ApiErrorEnvelope};

/// Texts larger than this are rejected before any backend call.
pub const MAX_TEXT_BYTES: usize = 1_000_000;
/// The backend refuses to classify documents shorter than this.
pub const MIN_CLASSIFY_WORDS: usize = 20;

#[derive(Debug, Error)]
pub enum NlpError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Anything that can turn raw text into a `TextSignal`.
/// Carried in `AppState` as `Arc<dyn NlpBackend>`.
#[async_trait]
pub trait NlpBackend: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<TextSignal, NlpError>;
}

/// Rejects empty and oversized text.
pub fn validate_text(text: &str) -> Result<(), NlpError> {
    if text.trim().is_empty() {
        return Err(NlpError::InvalidInput("text cannot be empty".to_string()));
    }
    if text.len() > MAX_TEXT_BYTES {
        return Err(NlpError::InvalidInput(format!(
            "text is {} bytes; the limit is {MAX_TEXT_BYTES}",
            text.len()
        )));
    }
    Ok(())
}

/// Client for the Cloud Natural Language REST API.
#[derive(Clone)]
pub struct LanguageApiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl LanguageApiClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, NlpError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()?,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn annotate_url(&self) -> String {
        format!("{}/v1/documents:annotateText", self.endpoint)
    }
}

#[async_trait]
impl NlpBackend for LanguageApiClient {
    async fn analyze(&self, text: &str) -> Result<TextSignal, NlpError> {
        validate_text(text)?;

        let classify = text.split_whitespace().count() >= MIN_CLASSIFY_WORDS;
        let request = AnnotateRequest::plain_text(text, classify);

        let response = self
            .client
            .post(self.annotate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(NlpError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let annotated: AnnotateResponse = serde_json::from_str(&body)?;
        debug!(
            "NLP call succeeded: entities={}, sentences={}, categories={}",
            annotated.entities.len(),
            annotated.sentences.len(),
            annotated.categories.len()
        );

        Ok(normalize(annotated))
    }
}

/// Converts the backend payload into the in-memory `TextSignal`.
fn normalize(resp: AnnotateResponse) -> TextSignal {
    TextSignal {
        sentiment: resp.document_sentiment.into(),
        entities: resp
            .entities
            .into_iter()
            .map(|e| Entity {
                name: e.name,
                entity_type: e.entity_type,
                salience: e.salience.clamp(0.0, 1.0),
                sentiment: e.sentiment.into(),
            })
            .collect(),
        sentences: resp
            .sentences
            .into_iter()
            .map(|s| Sentence {
                text: s.text.content,
                sentiment: s.sentiment.into(),
            })
            .collect(),
        categories: resp
            .categories
            .into_iter()
            .map(|c| ContentCategory {
                name: c.name,
                confidence: c.confidence,
            })
            .collect(),
    }
}

/// LLM client: the single point of entry for all prediction-endpoint calls.
///
/// ARCHITECTURAL RULE: No other module may call the prediction API directly.
/// All LLM interactions MUST go through `PredictionBackend`.
///
/// Failures are returned as-is: no retry, no fallback text.
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::PredictionSettings;

pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: Vec<PromptInstance<'a>>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PromptInstance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

impl From<PredictionSettings> for PredictParameters {
    fn from(s: PredictionSettings) -> Self {
        Self {
            temperature: s.temperature,
            max_output_tokens: s.max_output_tokens,
            top_p: s.top_p,
            top_k: s.top_k,
        }
    }
}

/// Text models answer either with a bare string or with `{ "content": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Prediction {
    Text(String),
    Content { content: String },
}

impl Prediction {
    fn into_text(self) -> String {
        match self {
            Prediction::Text(t) => t,
            Prediction::Content { content } => content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Free-text generation. Carried in `AppState` as `Arc<dyn PredictionBackend>`.
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    async fn predict(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Client for a hosted text model exposed as a `:predict` endpoint.
#[derive(Clone)]
pub struct PredictionClient {
    client: Client,
    endpoint: String,
    access_token: String,
    settings: PredictionSettings,
}

impl PredictionClient {
    pub fn new(
        endpoint: impl Into<String>,
        access_token: impl Into<String>,
        settings: PredictionSettings,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            endpoint: endpoint.into(),
            access_token: access_token.into(),
            settings,
        })
    }
}

#[async_trait]
impl PredictionBackend for PredictionClient {
    async fn predict(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = PredictRequest {
            instances: vec![PromptInstance { prompt }],
            parameters: self.settings.into(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: PredictResponse = serde_json::from_str(&body)?;
        let text = parsed
            .predictions
            .into_iter()
            .next()
            .map(Prediction::into_text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)?;

        debug!("Prediction call succeeded: {} chars", text.len());
        Ok(text)
    }
}

/// Calls the backend and deserializes the text response as JSON.
/// The prompt must instruct the model to return valid JSON.
pub async fn predict_json<T: DeserializeOwned>(
    backend: &dyn PredictionBackend,
    prompt: &str,
) -> Result<T, LlmError> {
    let text = backend.predict(prompt).await?;

    // Strip markdown code fences if the model wraps JSON in them
    let text = strip_json_fences(&text);

    serde_json::from_str(text).map_err(LlmError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

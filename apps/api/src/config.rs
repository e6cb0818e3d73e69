use std::str::FromStr;

use anyhow::{Context, Result};

const DEFAULT_NLP_ENDPOINT: &str = "https://language.googleapis.com";
const DEFAULT_IDENTITY_ENDPOINT: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub events_channel: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub nlp_endpoint: String,
    pub nlp_api_key: String,
    pub prediction_endpoint: String,
    pub prediction_access_token: String,
    pub prediction: PredictionSettings,
    pub identity_endpoint: String,
    pub identity_api_key: String,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

/// Sampling parameters sent with every prediction request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_output_tokens: 1024,
            top_p: 0.8,
            top_k: 40,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = PredictionSettings::default();

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            events_channel: optional_env("EVENTS_CHANNEL", "analysis-events"),
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            nlp_endpoint: optional_env("NLP_ENDPOINT", DEFAULT_NLP_ENDPOINT),
            nlp_api_key: require_env("NLP_API_KEY")?,
            prediction_endpoint: require_env("PREDICTION_ENDPOINT")?,
            prediction_access_token: require_env("PREDICTION_ACCESS_TOKEN")?,
            prediction: PredictionSettings {
                temperature: parse_env("LLM_TEMPERATURE", defaults.temperature)?,
                max_output_tokens: parse_env("LLM_MAX_OUTPUT_TOKENS", defaults.max_output_tokens)?,
                top_p: parse_env("LLM_TOP_P", defaults.top_p)?,
                top_k: parse_env("LLM_TOP_K", defaults.top_k)?,
            },
            identity_endpoint: optional_env("IDENTITY_ENDPOINT", DEFAULT_IDENTITY_ENDPOINT),
            identity_api_key: require_env("IDENTITY_API_KEY")?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

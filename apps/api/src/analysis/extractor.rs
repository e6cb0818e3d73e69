use futures::future::try_join_all;
use tracing::debug;

use crate::errors::AppError;
use crate::models::signal::TextSignal;
use crate::nlp_client::{validate_text, NlpBackend, NlpError};

/// The only path from request text to a `TextSignal`.
///
/// Invalid input surfaces as a 400 naming the field; every other backend
/// failure is an upstream error. Nothing is retried or cached.
pub struct TextSignalExtractor<'a> {
    backend: &'a dyn NlpBackend,
}

fn to_app_error(field: &str, e: NlpError) -> AppError {
    match e {
        NlpError::InvalidInput(msg) => AppError::Validation(format!("{field}: {msg}")),
        other => AppError::Nlp(format!("analysis of '{field}' failed: {other}")),
    }
}

impl<'a> TextSignalExtractor<'a> {
    pub fn new(backend: &'a dyn NlpBackend) -> Self {
        Self { backend }
    }

    pub async fn extract(&self, field: &str, text: &str) -> Result<TextSignal, AppError> {
        validate_text(text).map_err(|e| to_app_error(field, e))?;
        let signal = self
            .backend
            .analyze(text)
            .await
            .map_err(|e| to_app_error(field, e))?;
        debug!(
            "Extracted '{field}': {} entities, {} sentences",
            signal.entities.len(),
            signal.sentences.len()
        );
        Ok(signal)
    }

    /// Checks every field without calling the backend.
    pub fn validate(fields: &[(&str, &str)]) -> Result<(), AppError> {
        for (field, text) in fields {
            validate_text(text).map_err(|e| to_app_error(field, e))?;
        }
        Ok(())
    }

    /// Analyses every `(field, text)` pair concurrently. Signals come back in
    /// input order; the first failure fails the whole call.
    pub async fn extract_all(&self, fields: &[(&str, &str)]) -> Result<Vec<TextSignal>, AppError> {
        // Reject bad input before any backend call is made
        Self::validate(fields)?;
        try_join_all(fields.iter().map(|(field, text)| self.extract(field, text))).await
    }
}

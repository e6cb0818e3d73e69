//! Resume upload handling and analysis.
//!
//! # Text extraction
//! PDF parsing is CPU-bound, so `extract_text` runs it inside
//! `tokio::task::spawn_blocking` with owned bytes. Anything that is not a PDF
//! must be UTF-8 text.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::heuristics::{
    high_value_features, key_factors, match_score, missing_names, quantitative_mentions,
};
use crate::errors::AppError;
use crate::models::signal::{Sentiment, TextSignal};

const PDF_MAGIC: &[u8] = b"%PDF";

/// Raw file taken from the `file` multipart field.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn is_pdf(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.eq_ignore_ascii_case("application/pdf"))
            || self.file_name.to_ascii_lowercase().ends_with(".pdf")
            || self.bytes.starts_with(PDF_MAGIC)
    }

    pub fn extension(&self) -> &'static str {
        if self.is_pdf() {
            "pdf"
        } else {
            "txt"
        }
    }

    pub fn archive_content_type(&self) -> &'static str {
        if self.is_pdf() {
            "application/pdf"
        } else {
            "text/plain; charset=utf-8"
        }
    }

    /// `resumes/<user>/<uuid>.<ext>`
    pub fn archive_key(&self, user_id: &str) -> String {
        format!("resumes/{user_id}/{}.{}", Uuid::new_v4(), self.extension())
    }
}

pub async fn extract_text(doc: &UploadedDocument) -> Result<String, AppError> {
    let text = if doc.is_pdf() {
        let bytes = doc.bytes.clone();
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF extraction: {e}"))
            })?
            .map_err(|e| AppError::Validation(format!("file could not be read as PDF: {e}")))?
    } else {
        String::from_utf8(doc.bytes.to_vec())
            .map_err(|_| AppError::Validation("file must be a PDF or UTF-8 text".to_string()))?
    };

    if text.trim().is_empty() {
        return Err(AppError::Validation("file contains no text".to_string()));
    }
    Ok(text)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    pub score: u8,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub file_name: String,
    pub archive_key: String,
    pub word_count: usize,
    pub sentiment: Sentiment,
    pub skills: Vec<String>,
    pub highlights: Vec<String>,
    pub job_match: Option<JobMatch>,
    pub recommendations: Vec<String>,
}

pub fn analyze_resume(
    doc: &UploadedDocument,
    archive_key: String,
    text: &str,
    resume: &TextSignal,
    job: Option<&TextSignal>,
) -> ResumeAnalysis {
    let resume_names = resume.entity_names();
    let highlights = high_value_features(resume);

    let job_match = job.map(|jd| {
        let outcome = match_score(resume.sentiment.score, &resume_names, &jd.entity_names());
        JobMatch {
            score: outcome.score,
            matched_keywords: outcome.shared,
            missing_keywords: missing_names(&key_factors(jd), &resume_names),
        }
    });

    let mut recommendations = Vec::new();
    if let Some(m) = job_match.as_ref().filter(|m| !m.missing_keywords.is_empty()) {
        recommendations.push(format!(
            "Work these job keywords into your resume where they are true: {}.",
            m.missing_keywords.join(", ")
        ));
    }
    if highlights.is_empty() {
        recommendations
            .push("Lead with two or three standout achievements so they read as central.".to_string());
    }
    if quantitative_mentions(resume).is_empty() {
        recommendations.push("Quantify impact: add numbers, percentages or amounts.".to_string());
    }
    if resume.sentiment.score < 0.0 {
        recommendations.push("Use outcome-focused, positive language.".to_string());
    }
    if recommendations.is_empty() {
        recommendations.push("Strong resume; tailor the summary for each application.".to_string());
    }

    ResumeAnalysis {
        file_name: doc.file_name.clone(),
        archive_key,
        word_count: text.split_whitespace().count(),
        sentiment: resume.sentiment,
        skills: key_factors(resume),
        highlights,
        job_match,
        recommendations,
    }
}

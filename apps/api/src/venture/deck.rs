use serde::{Deserialize, Serialize};

use crate::analysis::heuristics::{high_value_features, polarity, Polarity};
use crate::errors::AppError;
use crate::models::signal::TextSignal;

pub const DEFAULT_AUDIENCE: &str = "early-stage investors";

#[derive(Debug, Deserialize)]
pub struct DeckRequest {
    pub startup_name: String,
    pub description: String,
    #[serde(default)]
    pub audience: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub speaker_notes: Option<String>,
}

/// The shape the model is asked to return.
#[derive(Debug, Deserialize)]
pub struct DeckDraft {
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchDeck {
    pub startup_name: String,
    pub audience: String,
    pub tone: Polarity,
    pub highlights: Vec<String>,
    pub slides: Vec<Slide>,
}

/// Slides with a blank title are dropped; a draft with nothing left is an
/// upstream failure.
pub fn assemble_deck(
    startup_name: &str,
    audience: &str,
    signal: &TextSignal,
    draft: DeckDraft,
) -> Result<PitchDeck, AppError> {
    let slides: Vec<Slide> = draft
        .slides
        .into_iter()
        .filter(|s| !s.title.trim().is_empty())
        .collect();
    if slides.is_empty() {
        return Err(AppError::Llm("deck draft contained no slides".to_string()));
    }

    Ok(PitchDeck {
        startup_name: startup_name.trim().to_string(),
        audience: audience.to_string(),
        tone: polarity(signal.sentiment.score),
        highlights: high_value_features(signal),
        slides,
    })
}

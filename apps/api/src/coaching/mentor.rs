//! Mentor Q&A and pitch practice feedback.

use serde::{Deserialize, Serialize};

use crate::analysis::heuristics::{
    average_sentence_length, key_factors, strength_candidates, to_score,
};
use crate::models::signal::{Sentiment, TextSignal};

/// Average sentence lengths outside this band get a delivery suggestion.
pub const LONG_SENTENCE_WORDS: f64 = 25.0;
pub const SHORT_SENTENCE_WORDS: f64 = 8.0;
/// Fewer sentences than this reads as an incomplete pitch.
pub const MIN_PITCH_SENTENCES: usize = 3;

#[derive(Debug, Deserialize)]
pub struct MentorQuestion {
    pub question: String,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorAnswer {
    pub answer: String,
    pub topics: Vec<String>,
    pub question_sentiment: Sentiment,
}

pub fn mentor_answer(question: &TextSignal, answer: String) -> MentorAnswer {
    MentorAnswer {
        answer,
        topics: key_factors(question),
        question_sentiment: question.sentiment,
    }
}

#[derive(Debug, Deserialize)]
pub struct PracticeRequest {
    pub transcript: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeFeedback {
    pub sentence_count: usize,
    pub average_sentence_length: f64,
    /// Document sentiment mapped onto 0–100.
    pub confidence_score: u8,
    pub key_messages: Vec<String>,
    pub suggestions: Vec<String>,
}

pub fn practice_feedback(transcript: &TextSignal) -> PracticeFeedback {
    let avg = average_sentence_length(transcript);
    let sentence_count = transcript.sentences.len();
    let key_messages = strength_candidates(transcript);
    let confidence_score = to_score((transcript.sentiment.score.clamp(-1.0, 1.0) + 1.0) * 50.0);

    let mut suggestions = Vec::new();
    if avg > LONG_SENTENCE_WORDS {
        suggestions.push(format!(
            "Sentences average {avg:.1} words; break them up so each lands on its own."
        ));
    } else if avg > 0.0 && avg < SHORT_SENTENCE_WORDS {
        suggestions.push(
            "Sentences are very short; connect related points so the story flows.".to_string(),
        );
    }
    if sentence_count < MIN_PITCH_SENTENCES {
        suggestions.push(
            "Expand the pitch: cover problem, solution, traction and the ask.".to_string(),
        );
    }
    if transcript.sentiment.score < 0.0 {
        suggestions.push(
            "The delivery reads as negative; reframe challenges as opportunities.".to_string(),
        );
    }
    if key_messages.is_empty() {
        suggestions.push(
            "No clear core message stood out; open with one memorable sentence.".to_string(),
        );
    }
    if suggestions.is_empty() {
        suggestions.push("Clear, confident delivery. Rehearse the close and the ask.".to_string());
    }

    PracticeFeedback {
        sentence_count,
        average_sentence_length: avg,
        confidence_score,
        key_messages,
        suggestions,
    }
}

//! Idea validation and founder guidance verdicts.

use serde::{Deserialize, Serialize};

use crate::analysis::heuristics::{
    financial_concerns, funding_stage, high_value_features, key_factors, FundingStage,
};
use crate::models::signal::{Sentiment, TextSignal};

#[derive(Debug, Deserialize)]
pub struct IdeaCheckRequest {
    pub idea: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaAssessment {
    pub sentiment: Sentiment,
    pub key_factors: Vec<String>,
    pub unique_value: Vec<String>,
    pub funding_stage: FundingStage,
    pub funding_guidance: String,
    /// Highest-confidence content category, when the idea was long enough to classify.
    pub category: Option<String>,
    pub feedback: String,
}

/// Classification half of an idea check. The LLM feedback is attached by the caller.
pub fn assess_idea(signal: &TextSignal, feedback: String) -> IdeaAssessment {
    let stage = funding_stage(signal.sentiment.score);
    IdeaAssessment {
        sentiment: signal.sentiment,
        key_factors: key_factors(signal),
        unique_value: high_value_features(signal),
        funding_stage: stage,
        funding_guidance: stage.guidance().to_string(),
        category: signal.top_category().map(|c| c.name.clone()),
        feedback,
    }
}

#[derive(Debug, Deserialize)]
pub struct GuidanceRequest {
    pub challenge: String,
    #[serde(default)]
    pub stage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guidance {
    pub focus_topics: Vec<String>,
    pub concerns: Vec<String>,
    /// Self-reported stage, echoed back when supplied.
    pub stage: Option<String>,
    pub funding_stage: FundingStage,
    pub advice: String,
}

pub fn build_guidance(signal: &TextSignal, stage: Option<String>, advice: String) -> Guidance {
    Guidance {
        focus_topics: key_factors(signal),
        concerns: financial_concerns(signal),
        stage,
        funding_stage: funding_stage(signal.sentiment.score),
        advice,
    }
}

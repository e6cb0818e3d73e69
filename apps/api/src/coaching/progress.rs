//! Progress tracking and history-derived recommendations.

use serde::{Deserialize, Serialize};

use crate::analysis::heuristics::{negative_entities, positive_entities};
use crate::models::record::Category;
use crate::models::signal::{Sentiment, TextSignal};
use crate::venture::funding::ReadinessReport;
use crate::venture::idea::IdeaAssessment;
use crate::venture::market::SwotAnalysis;

/// How many earlier updates the momentum baseline averages over.
pub const PROGRESS_WINDOW: i64 = 5;
/// Sentiment shift against the baseline that counts as a change in momentum.
pub const MOMENTUM_DELTA: f64 = 0.1;
/// Items taken from each SWOT list when building recommendations.
const SWOT_ITEMS: usize = 2;

// ────────────────────────────────────────────────────────────────────────────
// Progress
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub update: String,
    #[serde(default)]
    pub milestone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Momentum {
    FirstUpdate,
    Accelerating,
    Steady,
    Slowing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub milestone: Option<String>,
    pub sentiment: Sentiment,
    pub achievements: Vec<String>,
    pub blockers: Vec<String>,
    pub momentum: Momentum,
    /// Number of earlier updates the momentum was measured against.
    pub compared_with: usize,
}

/// `previous` is newest first, as read back from the store.
pub fn track_progress(
    update: &TextSignal,
    milestone: Option<String>,
    previous: &[ProgressUpdate],
) -> ProgressUpdate {
    let score = update.sentiment.score;
    let momentum = if previous.is_empty() {
        Momentum::FirstUpdate
    } else {
        let baseline =
            previous.iter().map(|p| p.sentiment.score).sum::<f64>() / previous.len() as f64;
        let delta = score - baseline;
        if delta > MOMENTUM_DELTA {
            Momentum::Accelerating
        } else if delta < -MOMENTUM_DELTA {
            Momentum::Slowing
        } else {
            Momentum::Steady
        }
    };

    ProgressUpdate {
        milestone,
        sentiment: update.sentiment,
        achievements: positive_entities(update),
        blockers: negative_entities(update),
        momentum,
        compared_with: previous.len(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Recommendations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationsRequest {
    #[serde(default)]
    pub focus: Option<String>,
}

/// Latest stored verdicts recommendations are derived from.
#[derive(Debug, Default)]
pub struct VerdictHistory {
    pub readiness: Option<ReadinessReport>,
    pub swot: Option<SwotAnalysis>,
    pub idea: Option<IdeaAssessment>,
    pub progress: Option<ProgressUpdate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// The verdict category this advice came from; absent for the getting-started hint.
    pub source: Option<Category>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub focus: Option<String>,
    pub focus_topics: Vec<String>,
    pub recommendations: Vec<Recommendation>,
}

fn advice(source: Category, text: String) -> Recommendation {
    Recommendation {
        source: Some(source),
        text,
    }
}

/// Recommendations mentioning a focus topic are moved to the front; the
/// relative order inside each group is kept.
pub fn recommend(
    history: &VerdictHistory,
    focus: Option<String>,
    focus_topics: Vec<String>,
) -> RecommendationSet {
    let mut out = Vec::new();

    if let Some(r) = &history.readiness {
        out.extend(
            r.recommendations
                .iter()
                .map(|text| advice(Category::Readiness, text.clone())),
        );
    }
    if let Some(s) = &history.swot {
        out.extend(s.swot.weaknesses.iter().take(SWOT_ITEMS).map(|w| {
            advice(Category::Swot, format!("Shore up a known weakness: {w}."))
        }));
        out.extend(s.swot.threats.iter().take(SWOT_ITEMS).map(|t| {
            advice(Category::Swot, format!("Prepare a response to the threat of {t}."))
        }));
        out.extend(s.swot.strengths.iter().take(1).map(|st| {
            advice(Category::Swot, format!("Lead your pitch with {st}."))
        }));
    }
    if let Some(i) = &history.idea {
        out.push(advice(Category::IdeaCheck, i.funding_guidance.clone()));
    }
    if let Some(p) = &history.progress {
        if p.momentum == Momentum::Slowing {
            out.push(advice(
                Category::Progress,
                "Momentum is slowing: cut scope to the one goal that matters this month."
                    .to_string(),
            ));
        }
        out.extend(
            p.blockers
                .iter()
                .map(|b| advice(Category::Progress, format!("Clear the blocker: {b}."))),
        );
    }

    if out.is_empty() {
        out.push(Recommendation {
            source: None,
            text: "Run an idea check or readiness assessment to get tailored recommendations."
                .to_string(),
        });
    }

    if !focus_topics.is_empty() {
        let topics: Vec<String> = focus_topics.iter().map(|t| t.to_lowercase()).collect();
        let (mut matching, rest): (Vec<_>, Vec<_>) = out.into_iter().partition(|r| {
            let text = r.text.to_lowercase();
            topics.iter().any(|t| text.contains(t.as_str()))
        });
        matching.extend(rest);
        out = matching;
    }

    RecommendationSet {
        focus,
        focus_topics,
        recommendations: out,
    }
}

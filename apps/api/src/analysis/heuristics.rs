//! Heuristic classifier: turns `TextSignal`s into qualitative business verdicts.
//!
//! Every rule is a fixed cut point; nothing here is learned or stateful, and
//! no function can fail on a well-formed signal. Entity order coming from the
//! backend is never trusted: anything that ranks entities sorts by salience
//! first.
//!
//! | Signal                  | Cut point   | Effect                                   |
//! |-------------------------|-------------|------------------------------------------|
//! | entity salience         | > 0.2       | key factor / needs / preferences         |
//! | entity salience         | > 0.3       | strength candidate                       |
//! | entity salience         | > 0.4       | unique value / high-value feature        |
//! | entity sentiment        | > 0 / < 0   | strength, opportunity / weakness, threat |
//! | entity sentiment        | < -0.2      | financial concern                        |
//! | document sentiment      | > 0.3 / < 0 | institutional-ready, aggressive / bootstrap, conservative |

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::signal::{Entity, EntityType, TextSignal};

pub const RELEVANT_SALIENCE: f64 = 0.2;
pub const STRENGTH_SALIENCE: f64 = 0.3;
pub const HIGH_VALUE_SALIENCE: f64 = 0.4;

pub const FINANCIAL_CONCERN_SENTIMENT: f64 = -0.2;
pub const INSTITUTIONAL_SENTIMENT: f64 = 0.3;

const MATCH_BASE_WEIGHT: f64 = 50.0;
const MATCH_OVERLAP_BONUS: f64 = 10.0;

/// Readiness component weights. Sum of `2 × weight` is exactly 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadinessWeights {
    pub business: f64,
    pub financial: f64,
    pub team: f64,
}

pub const READINESS_WEIGHTS: ReadinessWeights = ReadinessWeights {
    business: 20.0,
    financial: 20.0,
    team: 10.0,
};

// ────────────────────────────────────────────────────────────────────────────
// Score helpers
// ────────────────────────────────────────────────────────────────────────────

/// Clamps a sentiment into [-1, 1]; NaN reads as neutral.
fn unit_sentiment(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(-1.0, 1.0)
    }
}

/// Rounds into the closed 0–100 range used by every score field.
pub fn to_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 100.0).round() as u8
}

// ────────────────────────────────────────────────────────────────────────────
// Salience filtering
// ────────────────────────────────────────────────────────────────────────────

/// Entities sorted by salience descending. Ties keep backend order.
pub fn ranked_by_salience(entities: &[Entity]) -> Vec<&Entity> {
    let mut ranked: Vec<&Entity> = entities.iter().collect();
    ranked.sort_by(|a, b| b.salience.partial_cmp(&a.salience).unwrap_or(Ordering::Equal));
    ranked
}

/// Entities with salience strictly above `threshold`, most salient first.
pub fn salient_above(signal: &TextSignal, threshold: f64) -> Vec<&Entity> {
    ranked_by_salience(&signal.entities)
        .into_iter()
        .filter(|e| e.salience > threshold)
        .collect()
}

/// Deduplicates names case-insensitively, keeping the first spelling seen.
fn unique_names<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> Vec<String> {
    let mut seen = HashSet::new();
    entities
        .into_iter()
        .filter(|e| seen.insert(e.name.to_lowercase()))
        .map(|e| e.name.clone())
        .collect()
}

pub fn salient_names(signal: &TextSignal, threshold: f64) -> Vec<String> {
    unique_names(salient_above(signal, threshold))
}

/// Key factors, needs and preferences: salience > 0.2.
pub fn key_factors(signal: &TextSignal) -> Vec<String> {
    salient_names(signal, RELEVANT_SALIENCE)
}

/// Strength candidates: salience > 0.3.
pub fn strength_candidates(signal: &TextSignal) -> Vec<String> {
    salient_names(signal, STRENGTH_SALIENCE)
}

/// Unique value / high-value features: salience > 0.4.
pub fn high_value_features(signal: &TextSignal) -> Vec<String> {
    salient_names(signal, HIGH_VALUE_SALIENCE)
}

// ────────────────────────────────────────────────────────────────────────────
// Sentiment buckets
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Neutral,
    Negative,
}

pub fn polarity(score: f64) -> Polarity {
    if score > 0.0 {
        Polarity::Positive
    } else if score < 0.0 {
        Polarity::Negative
    } else {
        Polarity::Neutral
    }
}

/// Entities carrying positive sentiment, most salient first.
pub fn positive_entities(signal: &TextSignal) -> Vec<String> {
    unique_names(
        ranked_by_salience(&signal.entities)
            .into_iter()
            .filter(|e| e.sentiment.score > 0.0),
    )
}

/// Entities carrying negative sentiment, most salient first.
pub fn negative_entities(signal: &TextSignal) -> Vec<String> {
    unique_names(
        ranked_by_salience(&signal.entities)
            .into_iter()
            .filter(|e| e.sentiment.score < 0.0),
    )
}

/// Entities below -0.2 sentiment: concerns worth raising with a founder.
pub fn financial_concerns(signal: &TextSignal) -> Vec<String> {
    unique_names(
        ranked_by_salience(&signal.entities)
            .into_iter()
            .filter(|e| e.sentiment.score < FINANCIAL_CONCERN_SENTIMENT),
    )
}

/// Numbers and prices mentioned in the text, most salient first.
pub fn quantitative_mentions(signal: &TextSignal) -> Vec<String> {
    unique_names(
        ranked_by_salience(&signal.entities)
            .into_iter()
            .filter(|e| matches!(e.entity_type, EntityType::Number | EntityType::Price)),
    )
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Swot {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

/// Salient (> 0.3) entities are internal strengths/weaknesses; the rest are
/// external opportunities/threats. Neutral entities land nowhere.
pub fn swot(signal: &TextSignal) -> Swot {
    let mut out = Swot::default();
    let mut seen = HashSet::new();

    for e in ranked_by_salience(&signal.entities) {
        if !seen.insert(e.name.to_lowercase()) {
            continue;
        }
        let internal = e.salience > STRENGTH_SALIENCE;
        let bucket = match (polarity(e.sentiment.score), internal) {
            (Polarity::Positive, true) => &mut out.strengths,
            (Polarity::Negative, true) => &mut out.weaknesses,
            (Polarity::Positive, false) => &mut out.opportunities,
            (Polarity::Negative, false) => &mut out.threats,
            (Polarity::Neutral, _) => continue,
        };
        bucket.push(e.name.clone());
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Document-level classification
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingStage {
    InstitutionalReady,
    AngelReady,
    BootstrapFirst,
}

impl FundingStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FundingStage::InstitutionalReady => "institutional_ready",
            FundingStage::AngelReady => "angel_ready",
            FundingStage::BootstrapFirst => "bootstrap_first",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            FundingStage::InstitutionalReady => {
                "Ready for institutional investment: approach seed and Series A funds."
            }
            FundingStage::AngelReady => {
                "Build traction with angels or accelerators before institutional rounds."
            }
            FundingStage::BootstrapFirst => {
                "Bootstrap first: validate demand and reduce risk before raising."
            }
        }
    }
}

pub fn funding_stage(document_score: f64) -> FundingStage {
    if document_score > INSTITUTIONAL_SENTIMENT {
        FundingStage::InstitutionalReady
    } else if document_score < 0.0 {
        FundingStage::BootstrapFirst
    } else {
        FundingStage::AngelReady
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Posture {
    Aggressive,
    Balanced,
    Conservative,
}

pub fn strategy_posture(document_score: f64) -> Posture {
    if document_score > INSTITUTIONAL_SENTIMENT {
        Posture::Aggressive
    } else if document_score < 0.0 {
        Posture::Conservative
    } else {
        Posture::Balanced
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Composite scores
// ────────────────────────────────────────────────────────────────────────────

/// `(sentiment + 1) × weight`, never negative.
pub fn readiness_component(score: f64, weight: f64) -> f64 {
    (unit_sentiment(score) + 1.0) * weight
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadinessBreakdown {
    pub business: f64,
    pub financial: f64,
    pub team: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadinessScore {
    pub score: u8,
    pub breakdown: ReadinessBreakdown,
}

pub fn readiness_score(business: f64, financial: f64, team: f64) -> ReadinessScore {
    let w = READINESS_WEIGHTS;
    let breakdown = ReadinessBreakdown {
        business: readiness_component(business, w.business),
        financial: readiness_component(financial, w.financial),
        team: readiness_component(team, w.team),
    };
    ReadinessScore {
        score: to_score(breakdown.business + breakdown.financial + breakdown.team),
        breakdown,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub score: u8,
    pub shared: Vec<String>,
}

/// `(sentiment + 1) × 50 + 10` per name present in both sets (case-insensitive),
/// capped at 100.
pub fn match_score(base_sentiment: f64, ours: &[String], theirs: &[String]) -> MatchOutcome {
    let theirs: HashSet<String> = theirs.iter().map(|n| n.to_lowercase()).collect();
    let mut seen = HashSet::new();
    let shared: Vec<String> = ours
        .iter()
        .filter(|n| {
            let lower = n.to_lowercase();
            theirs.contains(&lower) && seen.insert(lower)
        })
        .cloned()
        .collect();

    let base = (unit_sentiment(base_sentiment) + 1.0) * MATCH_BASE_WEIGHT;
    MatchOutcome {
        score: to_score(base + MATCH_OVERLAP_BONUS * shared.len() as f64),
        shared,
    }
}

/// Concatenates name lists, keeping the first spelling of each name.
pub fn merge_names<I>(lists: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut seen = HashSet::new();
    lists
        .into_iter()
        .flatten()
        .filter(|n| seen.insert(n.to_lowercase()))
        .collect()
}

/// Names from `wanted` that never appear in `have` (case-insensitive).
pub fn missing_names(wanted: &[String], have: &[String]) -> Vec<String> {
    let have: HashSet<String> = have.iter().map(|n| n.to_lowercase()).collect();
    wanted
        .iter()
        .filter(|n| !have.contains(&n.to_lowercase()))
        .cloned()
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Syntax metrics
// ────────────────────────────────────────────────────────────────────────────

/// Mean words per sentence. Zero sentences yield 0.0 rather than NaN.
pub fn average_sentence_length(signal: &TextSignal) -> f64 {
    if signal.sentences.is_empty() {
        return 0.0;
    }
    let words: usize = signal.sentences.iter().map(|s| s.word_count()).sum();
    words as f64 / signal.sentences.len() as f64
}

// ────────────────────────────────────────────────────────────────────────────
// Competitors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitorStance {
    /// Described favourably: a credible threat.
    Strong,
    Neutral,
    /// Described unfavourably: a gap to exploit.
    Weak,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorScore {
    pub name: String,
    /// salience × 100
    pub score: u8,
    pub stance: CompetitorStance,
}

/// Organizations and products named in the text, scored by prominence.
pub fn competitor_scores(signal: &TextSignal) -> Vec<CompetitorScore> {
    let mut seen = HashSet::new();
    ranked_by_salience(&signal.entities)
        .into_iter()
        .filter(|e| {
            matches!(
                e.entity_type,
                EntityType::Organization | EntityType::ConsumerGood
            )
        })
        .filter(|e| seen.insert(e.name.to_lowercase()))
        .map(|e| CompetitorScore {
            name: e.name.clone(),
            score: to_score(e.salience * 100.0),
            stance: match polarity(e.sentiment.score) {
                Polarity::Positive => CompetitorStance::Strong,
                Polarity::Neutral => CompetitorStance::Neutral,
                Polarity::Negative => CompetitorStance::Weak,
            },
        })
        .collect()
}

//! Investor matching and investment readiness.

use serde::{Deserialize, Serialize};

use crate::analysis::heuristics::{
    financial_concerns, funding_stage, key_factors, match_score, quantitative_mentions,
    readiness_score, strength_candidates, FundingStage, ReadinessBreakdown, READINESS_WEIGHTS,
};
use crate::errors::AppError;
use crate::models::signal::TextSignal;

pub const MAX_INVESTORS: usize = 25;

// ────────────────────────────────────────────────────────────────────────────
// Investor match
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct InvestorProfile {
    pub name: String,
    pub thesis: String,
}

#[derive(Debug, Deserialize)]
pub struct InvestorMatchRequest {
    pub pitch: String,
    pub investors: Vec<InvestorProfile>,
}

impl InvestorMatchRequest {
    /// Thesis text is checked later by the extractor; names and list size are checked here.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.investors.is_empty() {
            return Err(AppError::Validation(
                "investors must list at least one investor".to_string(),
            ));
        }
        if self.investors.len() > MAX_INVESTORS {
            return Err(AppError::Validation(format!(
                "investors lists {} entries; the limit is {MAX_INVESTORS}",
                self.investors.len()
            )));
        }
        if let Some(i) = self.investors.iter().position(|p| p.name.trim().is_empty()) {
            return Err(AppError::Validation(format!(
                "investors[{i}].name cannot be empty"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorMatch {
    pub name: String,
    pub score: u8,
    pub shared_interests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorMatchReport {
    pub funding_stage: FundingStage,
    /// What the pitch emphasises (salience > 0.2).
    pub preferences: Vec<String>,
    /// Best match first; ties keep request order.
    pub matches: Vec<InvestorMatch>,
}

/// Scores each investor thesis against the pitch. The base of every score is
/// the pitch's document sentiment; overlap is over all entity names.
pub fn rank_investors(
    pitch: &TextSignal,
    theses: &[(String, TextSignal)],
) -> InvestorMatchReport {
    let pitch_names = pitch.entity_names();

    let mut matches: Vec<InvestorMatch> = theses
        .iter()
        .map(|(name, thesis)| {
            let outcome =
                match_score(pitch.sentiment.score, &pitch_names, &thesis.entity_names());
            InvestorMatch {
                name: name.clone(),
                score: outcome.score,
                shared_interests: outcome.shared,
            }
        })
        .collect();
    matches.sort_by(|a, b| b.score.cmp(&a.score));

    InvestorMatchReport {
        funding_stage: funding_stage(pitch.sentiment.score),
        preferences: key_factors(pitch),
        matches,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Readiness
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReadinessRequest {
    pub business_plan: String,
    pub financials: String,
    pub team: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub score: u8,
    pub breakdown: ReadinessBreakdown,
    pub funding_stage: FundingStage,
    pub financial_concerns: Vec<String>,
    pub financial_metrics: Vec<String>,
    pub team_strengths: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn readiness_report(
    plan: &TextSignal,
    financials: &TextSignal,
    team: &TextSignal,
) -> ReadinessReport {
    let scored = readiness_score(
        plan.sentiment.score,
        financials.sentiment.score,
        team.sentiment.score,
    );
    let concerns = financial_concerns(financials);
    let metrics = quantitative_mentions(financials);
    let team_strengths = strength_candidates(team);

    let w = READINESS_WEIGHTS;
    let b = scored.breakdown;
    let mut recommendations = Vec::new();
    // A component below its weight means that text read as negative
    if b.business < w.business {
        recommendations.push(
            "Sharpen the business plan: state the problem, customer and wedge plainly.".to_string(),
        );
    }
    if b.financial < w.financial {
        recommendations.push(
            "Rework the financial model: show a credible path to revenue and runway.".to_string(),
        );
    }
    if b.team < w.team {
        recommendations.push(
            "Strengthen the team story: highlight relevant experience or fill key gaps."
                .to_string(),
        );
    }
    if !concerns.is_empty() {
        recommendations.push(format!("Address investor concerns about {}.", concerns.join(", ")));
    }
    if metrics.is_empty() {
        recommendations
            .push("Add concrete numbers: revenue, growth rate, burn and runway.".to_string());
    }
    if recommendations.is_empty() {
        recommendations.push(
            "Materials read as investment-ready; start building the pipeline.".to_string(),
        );
    }

    ReadinessReport {
        score: scored.score,
        breakdown: b,
        funding_stage: funding_stage(plan.sentiment.score),
        financial_concerns: concerns,
        financial_metrics: metrics,
        team_strengths,
        recommendations,
    }
}

//! Market-facing verdicts: SWOT, market analysis, competitor landscape and
//! strategy posture.

use serde::{Deserialize, Serialize};

use crate::analysis::heuristics::{
    competitor_scores, high_value_features, key_factors, merge_names, missing_names,
    negative_entities, polarity, strategy_posture, strength_candidates, swot, CompetitorScore,
    Polarity, Posture, Swot,
};
use crate::models::signal::{Sentiment, TextSignal};

// ────────────────────────────────────────────────────────────────────────────
// SWOT
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SwotRequest {
    pub business_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwotAnalysis {
    pub sentiment: Sentiment,
    #[serde(flatten)]
    pub swot: Swot,
}

pub fn swot_analysis(signal: &TextSignal) -> SwotAnalysis {
    SwotAnalysis {
        sentiment: signal.sentiment,
        swot: swot(signal),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Market analysis
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MarketAnalysisRequest {
    pub market: String,
    pub industry: String,
    pub trends: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldReading {
    pub sentiment: Sentiment,
    pub polarity: Polarity,
}

impl FieldReading {
    fn of(signal: &TextSignal) -> Self {
        Self {
            sentiment: signal.sentiment,
            polarity: polarity(signal.sentiment.score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub market: FieldReading,
    pub industry: FieldReading,
    pub trends: FieldReading,
    /// Polarity of the mean document sentiment across all three fields.
    pub outlook: Polarity,
    pub key_factors: Vec<String>,
    pub emerging_trends: Vec<String>,
    pub risks: Vec<String>,
    pub categories: Vec<String>,
}

pub fn market_analysis(
    market: &TextSignal,
    industry: &TextSignal,
    trends: &TextSignal,
) -> MarketAnalysis {
    let all = [market, industry, trends];
    let mean = all.iter().map(|s| s.sentiment.score).sum::<f64>() / all.len() as f64;

    MarketAnalysis {
        market: FieldReading::of(market),
        industry: FieldReading::of(industry),
        trends: FieldReading::of(trends),
        outlook: polarity(mean),
        key_factors: merge_names([key_factors(market), key_factors(industry)]),
        emerging_trends: high_value_features(trends),
        risks: merge_names(all.iter().map(|s| negative_entities(s))),
        categories: merge_names(
            all.iter()
                .map(|s| s.categories.iter().map(|c| c.name.clone()).collect()),
        ),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Competitors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CompetitorRequest {
    pub competitors: String,
    #[serde(default)]
    pub product: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorLandscape {
    pub competitors: Vec<CompetitorScore>,
    /// High-value features of the caller's product that no competitor is named for.
    pub differentiators: Vec<String>,
    pub sentiment: Sentiment,
}

pub fn competitor_landscape(
    competitors: &TextSignal,
    product: Option<&TextSignal>,
) -> CompetitorLandscape {
    let scores = competitor_scores(competitors);
    let differentiators = product
        .map(|p| {
            let rivals: Vec<String> = competitors.entity_names();
            missing_names(&high_value_features(p), &rivals)
        })
        .unwrap_or_default();

    CompetitorLandscape {
        competitors: scores,
        differentiators,
        sentiment: competitors.sentiment,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Strategy
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StrategyRequest {
    pub business_description: String,
    pub goals: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyPlan {
    pub posture: Posture,
    pub focus_areas: Vec<String>,
    pub growth_levers: Vec<String>,
    pub risks: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn strategy_plan(business: &TextSignal, goals: &TextSignal) -> StrategyPlan {
    let posture = strategy_posture(business.sentiment.score);
    let focus_areas = strength_candidates(business);
    let growth_levers = high_value_features(goals);
    let risks = merge_names([negative_entities(business), negative_entities(goals)]);

    let mut recommendations = vec![match posture {
        Posture::Aggressive => {
            "Invest ahead of demand: expand channels and hire for growth.".to_string()
        }
        Posture::Balanced => {
            "Grow steadily: double down on what works and test one new channel at a time."
                .to_string()
        }
        Posture::Conservative => {
            "Protect runway: focus on retention and unit economics before expanding.".to_string()
        }
    }];
    if let Some(lever) = growth_levers.first() {
        recommendations.push(format!("Make {lever} the headline goal for the next quarter."));
    }
    if let Some(area) = focus_areas.first() {
        recommendations.push(format!("Build the plan around your strength in {area}."));
    }
    if !risks.is_empty() {
        recommendations.push(format!("Mitigate risks early: {}.", risks.join(", ")));
    }

    StrategyPlan {
        posture,
        focus_areas,
        growth_levers,
        risks,
        recommendations,
    }
}

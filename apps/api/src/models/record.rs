use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// The per-user collection a verdict is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    IdeaCheck,
    Swot,
    MarketAnalysis,
    Competitors,
    Strategy,
    Guidance,
    InvestorMatch,
    Readiness,
    PitchDeck,
    MentorQa,
    PracticeFeedback,
    ResumeAnalysis,
    Progress,
    Recommendations,
}

impl Category {
    pub const ALL: [Category; 14] = [
        Category::IdeaCheck,
        Category::Swot,
        Category::MarketAnalysis,
        Category::Competitors,
        Category::Strategy,
        Category::Guidance,
        Category::InvestorMatch,
        Category::Readiness,
        Category::PitchDeck,
        Category::MentorQa,
        Category::PracticeFeedback,
        Category::ResumeAnalysis,
        Category::Progress,
        Category::Recommendations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::IdeaCheck => "idea_check",
            Category::Swot => "swot",
            Category::MarketAnalysis => "market_analysis",
            Category::Competitors => "competitors",
            Category::Strategy => "strategy",
            Category::Guidance => "guidance",
            Category::InvestorMatch => "investor_match",
            Category::Readiness => "readiness",
            Category::PitchDeck => "pitch_deck",
            Category::MentorQa => "mentor_qa",
            Category::PracticeFeedback => "practice_feedback",
            Category::ResumeAnalysis => "resume_analysis",
            Category::Progress => "progress",
            Category::Recommendations => "recommendations",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category '{s}'"))
    }
}

/// One appended verdict. Rows are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRecordRow {
    pub id: Uuid,
    pub user_id: String,
    pub category: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

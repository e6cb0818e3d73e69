use serde::{Deserialize, Serialize};

/// Polarity and intensity pair reported for documents, sentences and entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// -1.0 (negative) to 1.0 (positive)
    pub score: f64,
    /// >= 0.0, overall emotional strength regardless of polarity
    pub magnitude: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Unknown,
    Person,
    Location,
    Organization,
    Event,
    WorkOfArt,
    ConsumerGood,
    PhoneNumber,
    Address,
    Date,
    Number,
    Price,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub entity_type: EntityType,
    /// 0.0 – 1.0, how central the entity is to the analysed text
    pub salience: f64,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    pub sentiment: Sentiment,
}

impl Sentence {
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentCategory {
    pub name: String,
    pub confidence: f64,
}

/// Normalized output of one NLP analysis. Built once per input text and
/// never mutated; only verdicts derived from it are persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextSignal {
    pub sentiment: Sentiment,
    pub entities: Vec<Entity>,
    pub sentences: Vec<Sentence>,
    pub categories: Vec<ContentCategory>,
}

impl TextSignal {
    /// Entity names, deduplicated case-insensitively, in first-seen order.
    pub fn entity_names(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.entities
            .iter()
            .filter(|e| seen.insert(e.name.to_lowercase()))
            .map(|e| e.name.clone())
            .collect()
    }

    /// Highest-confidence content category, if the backend classified the text.
    pub fn top_category(&self) -> Option<&ContentCategory> {
        self.categories
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }
}

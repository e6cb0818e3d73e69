// Venture routes: idea validation, market and competitor analysis, strategy,
// funding readiness, investor matching and pitch decks.
// All NLP calls go through analysis::TextSignalExtractor and all LLM calls
// through llm_client.

pub mod deck;
pub mod funding;
pub mod handlers;
pub mod idea;
pub mod market;
pub mod prompts;

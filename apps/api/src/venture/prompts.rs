// All LLM prompt templates for the venture routes.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{render, ADVISOR_PERSONA, JSON_ONLY_INSTRUCTION};

/// Idea feedback template. Replace `{idea}`, `{key_factors}` and `{stage}`.
pub const IDEA_FEEDBACK_TEMPLATE: &str = r#"A founder submitted this startup idea:

"{idea}"

Text analysis flagged these key factors: {key_factors}.
Current funding assessment: {stage}.

Give feedback in three short paragraphs:
1. What is compelling about the idea.
2. The biggest risk or open question.
3. The single most useful next step this week."#;

/// Guidance template. Replace `{challenge}`, `{stage}` and `{concerns}`.
pub const GUIDANCE_TEMPLATE: &str = r#"A founder at the {stage} stage describes this challenge:

"{challenge}"

Concerns detected in their description: {concerns}.

Give practical guidance: name the root problem, then list up to five concrete
actions in priority order. Keep it under 250 words."#;

/// Pitch deck template. Replace `{startup_name}`, `{description}`, `{audience}`
/// and `{highlights}`.
pub const DECK_TEMPLATE: &str = r#"Draft a pitch deck outline for "{startup_name}" aimed at {audience}.

Company description:
"{description}"

Emphasise these highlights where they fit: {highlights}.

Return a JSON object with this EXACT schema (no extra fields):
{
  "slides": [
    {"title": "Problem", "bullets": ["...", "..."], "speaker_notes": "..."}
  ]
}

Produce between 8 and 12 slides covering problem, solution, market, product,
business model, traction, competition, team, financials and the ask."#;

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

pub fn idea_feedback_prompt(idea: &str, key_factors: &[String], stage: &str) -> String {
    let body = render(
        IDEA_FEEDBACK_TEMPLATE,
        &[
            ("idea", idea),
            ("key_factors", &list_or_none(key_factors)),
            ("stage", stage),
        ],
    );
    format!("{ADVISOR_PERSONA}\n\n{body}")
}

pub fn guidance_prompt(challenge: &str, stage: &str, concerns: &[String]) -> String {
    let body = render(
        GUIDANCE_TEMPLATE,
        &[
            ("challenge", challenge),
            ("stage", stage),
            ("concerns", &list_or_none(concerns)),
        ],
    );
    format!("{ADVISOR_PERSONA}\n\n{body}")
}

pub fn deck_prompt(
    startup_name: &str,
    description: &str,
    audience: &str,
    highlights: &[String],
) -> String {
    let body = render(
        DECK_TEMPLATE,
        &[
            ("startup_name", startup_name),
            ("description", description),
            ("audience", audience),
            ("highlights", &list_or_none(highlights)),
        ],
    );
    format!("{ADVISOR_PERSONA}\n\n{body}\n\n{JSON_ONLY_INSTRUCTION}")
}

// Prompt templates for the coaching routes.

use crate::llm_client::prompts::{render, ADVISOR_PERSONA};

/// Mentor answer template. Replace `{question}`, `{context}` and `{topics}`.
pub const MENTOR_TEMPLATE: &str = r#"A founder asks their mentor:

"{question}"

Background they shared: {context}
Topics the question centres on: {topics}.

Answer directly as a mentor would. Open with the answer in one or two
sentences, then give supporting reasoning and at most three next steps."#;

pub fn mentor_prompt(question: &str, context: Option<&str>, topics: &[String]) -> String {
    let topics = if topics.is_empty() {
        "none identified".to_string()
    } else {
        topics.join(", ")
    };
    let body = render(
        MENTOR_TEMPLATE,
        &[
            ("question", question),
            ("context", context.unwrap_or("none")),
            ("topics", &topics),
        ],
    );
    format!("{ADVISOR_PERSONA}\n\n{body}")
}

// Shared prompt fragments.
// Each route family that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Persona preamble prepended to every advisory prompt.
pub const ADVISOR_PERSONA: &str = "You are an experienced startup advisor and mentor. \
    You give candid, specific, actionable advice to early-stage founders. \
    Keep answers concise and avoid generic platitudes.";

/// Instruction appended to prompts that expect structured output.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Fills `{key}` placeholders in a template. Unknown placeholders are left intact.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

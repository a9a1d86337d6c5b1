// Shared prompt constants and prompt-building utilities.
// Each capability that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Role framing shared by every interview prompt.
pub const INTERVIEWER_PERSONA: &str = "You are an experienced technical interviewer \
    running a structured mock interview. You are fair, specific, and concise.";

/// Builds a system prompt from the shared persona, a task line and the JSON rule.
pub fn system_prompt(task: &str) -> String {
    format!("{INTERVIEWER_PERSONA} {task} {JSON_ONLY_SYSTEM}")
}

/// Joins a list for inclusion in a prompt, or returns `fallback` when empty.
pub fn join_or<'a>(items: impl IntoIterator<Item = &'a str>, fallback: &str) -> String {
    let joined = items.into_iter().collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        fallback.to_string()
    } else {
        joined
    }
}

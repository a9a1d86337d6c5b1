// All LLM prompt constants for report recommendations.

/// Task line for the advice system prompt.
pub const ADVICE_TASK: &str =
    "Write one actionable study recommendation for a skill the candidate struggled with.";

/// Recommendation prompt template.
/// Replace: {role}, {skill}, {mean_score}, {question_summaries}
pub const ADVICE_PROMPT_TEMPLATE: &str = r#"The candidate is preparing for a {role} interview.
They averaged {mean_score}/100 on questions about {skill}.

Questions asked on this skill, with their scores and evaluator feedback:
{question_summaries}

Return a JSON object with this EXACT schema:
{"recommendation": "..."}

RULES:
1. One or two sentences, addressed to the candidate as "you"
2. Name a concrete practice activity, not generic encouragement
3. Do NOT repeat the questions verbatim"#;

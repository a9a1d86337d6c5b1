// All LLM prompt constants for answer evaluation.

/// Task line for the evaluation system prompt.
pub const EVALUATION_TASK: &str = "Evaluate a candidate's interview answer on four dimensions.";

/// Evaluation prompt template.
/// Replace: {role}, {difficulty}, {question_type}, {skill_tags}, {question}, {answer}
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Evaluate this interview response for a {role} candidate.

Question ({difficulty} {question_type}, skills: {skill_tags}):
{question}

Answer:
{answer}

Score each dimension from 0 to 100:
- accuracy: correctness and factual accuracy
- clarity: organization and articulation
- depth: detail, examples and thoroughness
- relevance: how directly it addresses the question

Also provide "feedback": ONE sentence of actionable advice.

Return a JSON object with this EXACT schema:
{"accuracy": 0, "clarity": 0, "depth": 0, "relevance": 0, "feedback": "..."}"#;

// All LLM prompt constants for question generation.

/// Task line for the generation system prompt.
pub const QUESTION_TASK: &str = "Generate exactly one interview question tailored to the target role.";

/// Question generation prompt template.
/// Replace: {role}, {requirements}, {candidate_skills}, {experience},
///          {difficulty}, {question_type}, {previous_questions}
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"Generate ONE interview question for this candidate.

TARGET ROLE: {role}
ROLE REQUIREMENTS: {requirements}
CANDIDATE SKILLS: {candidate_skills}
RECENT EXPERIENCE: {experience}

The question MUST be a {difficulty} difficulty, {question_type} question that tests
knowledge or experience relevant to the role requirements above.

Previously asked (do NOT repeat or paraphrase these):
{previous_questions}

Return a JSON object with this EXACT schema:
{"question": "...", "skill_tags": ["skill the question tests"]}

RULES:
1. `skill_tags` must name one or two skills from the role requirements or candidate skills
2. The question must be answerable verbally in under three minutes
3. No multi-part questions"#;

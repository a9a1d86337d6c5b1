//! Question generation via Claude.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::CapabilityError;
use crate::llm_client::prompts::{join_or, system_prompt};
use crate::llm_client::LlmClient;
use crate::models::profile::ProfileContext;
use crate::models::question::Question;
use crate::question_bank::prompts::{QUESTION_PROMPT_TEMPLATE, QUESTION_TASK};
use crate::question_bank::{QuestionGenerator, QuestionRequest};

/// Higher temperature keeps consecutive questions varied.
const GENERATION_TEMPERATURE: f32 = 0.8;
/// How many previous questions are shown to the model.
const PREVIOUS_QUESTIONS_SHOWN: usize = 5;

pub struct LlmQuestionGenerator(pub LlmClient);

#[derive(Debug, Deserialize)]
struct QuestionPayload {
    question: String,
    #[serde(default)]
    skill_tags: Vec<String>,
}

#[async_trait]
impl QuestionGenerator for LlmQuestionGenerator {
    async fn generate_question(
        &self,
        request: &QuestionRequest<'_>,
    ) -> Result<Option<Question>, CapabilityError> {
        let prompt = build_question_prompt(request);
        let payload: QuestionPayload = self
            .0
            .call_json(&prompt, &system_prompt(QUESTION_TASK), GENERATION_TEMPERATURE)
            .await?;

        into_question(payload, request).map(Some)
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

fn build_question_prompt(request: &QuestionRequest<'_>) -> String {
    let profile = request.profile;

    let previous = request
        .asked
        .iter()
        .rev()
        .take(PREVIOUS_QUESTIONS_SHOWN)
        .map(|q| format!("- {}", q.text))
        .collect::<Vec<_>>();
    let previous = if previous.is_empty() {
        "(none)".to_string()
    } else {
        previous.join("\n")
    };

    QUESTION_PROMPT_TEMPLATE
        .replace("{role}", &profile.target_role)
        .replace(
            "{requirements}",
            &join_or(profile.role_requirements.iter().map(String::as_str), "not specified"),
        )
        .replace(
            "{candidate_skills}",
            &join_or(profile.skills.iter().map(String::as_str), "not specified"),
        )
        .replace(
            "{experience}",
            profile.latest_experience_title().unwrap_or("not specified"),
        )
        .replace("{difficulty}", request.difficulty.as_str())
        .replace("{question_type}", request.kind.as_str())
        .replace("{previous_questions}", &previous)
}

/// Validates model output against the request. Repeats, blank questions and
/// off-profile tags are rejected so the caller can fall back.
fn into_question(
    payload: QuestionPayload,
    request: &QuestionRequest<'_>,
) -> Result<Question, CapabilityError> {
    let text = payload.question.trim();
    if text.is_empty() {
        return Err(CapabilityError::InvalidOutput(
            "generated question was empty".to_string(),
        ));
    }

    let mut tags: Vec<String> = payload
        .skill_tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        tags.extend(fallback_tag(request.profile));
    }

    let question = Question::new(text, request.kind, request.difficulty, tags);

    if !request.is_unused(&question) {
        return Err(CapabilityError::InvalidOutput(
            "generated question repeats an earlier one".to_string(),
        ));
    }
    if request.requires_skill_overlap() && !request.profile.overlaps(&question.skill_tags) {
        return Err(CapabilityError::InvalidOutput(format!(
            "generated skill tags {:?} do not overlap the profile",
            question.skill_tags
        )));
    }
    Ok(question)
}

fn fallback_tag(profile: &ProfileContext) -> Option<String> {
    profile.focus_skills().into_iter().next()
}

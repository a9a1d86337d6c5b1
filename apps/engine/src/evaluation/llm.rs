//! Semantic evaluator via Claude.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::CapabilityError;
use crate::evaluation::prompts::{EVALUATION_PROMPT_TEMPLATE, EVALUATION_TASK};
use crate::evaluation::{AnswerEvaluator, Evaluation};
use crate::llm_client::prompts::{join_or, system_prompt};
use crate::llm_client::LlmClient;
use crate::models::profile::ProfileContext;
use crate::models::question::Question;

/// Low temperature keeps scores stable across identical answers.
const EVALUATION_TEMPERATURE: f32 = 0.2;

pub struct LlmEvaluator(pub LlmClient);

/// Raw model output. Every score must be present.
#[derive(Debug, Deserialize)]
struct EvaluationPayload {
    accuracy: f64,
    clarity: f64,
    depth: f64,
    relevance: f64,
    #[serde(default)]
    feedback: Option<String>,
}

#[async_trait]
impl AnswerEvaluator for LlmEvaluator {
    async fn evaluate_answer(
        &self,
        question: &Question,
        answer_text: &str,
        profile: &ProfileContext,
    ) -> Result<Evaluation, CapabilityError> {
        // Nothing to judge; no need to spend a call.
        if answer_text.trim().is_empty() {
            return Ok(Evaluation::empty());
        }

        let prompt = build_evaluation_prompt(question, answer_text, profile);
        let payload: EvaluationPayload = self
            .0
            .call_json(&prompt, &system_prompt(EVALUATION_TASK), EVALUATION_TEMPERATURE)
            .await?;

        into_evaluation(payload)
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

fn build_evaluation_prompt(question: &Question, answer_text: &str, profile: &ProfileContext) -> String {
    EVALUATION_PROMPT_TEMPLATE
        .replace("{role}", &profile.target_role)
        .replace("{difficulty}", question.difficulty.as_str())
        .replace("{question_type}", question.kind.as_str())
        .replace(
            "{skill_tags}",
            &join_or(question.skill_tags.iter().map(String::as_str), "general"),
        )
        .replace("{question}", &question.text)
        .replace("{answer}", answer_text.trim())
}

fn into_evaluation(payload: EvaluationPayload) -> Result<Evaluation, CapabilityError> {
    let scores = [
        payload.accuracy,
        payload.clarity,
        payload.depth,
        payload.relevance,
    ];
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(CapabilityError::InvalidOutput(
            "evaluation contained a non-numeric score".to_string(),
        ));
    }

    Ok(Evaluation {
        accuracy: payload.accuracy,
        clarity: payload.clarity,
        depth: payload.depth,
        relevance: payload.relevance,
        feedback: payload.feedback,
        answered_by: None,
    }
    .clamped())
}

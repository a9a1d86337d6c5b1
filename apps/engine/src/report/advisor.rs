//! Advisor: turns a weak skill into one actionable recommendation.
//!
//! Default: `RuleBasedAdvisor` (templated on the weakest scoring dimension).
//! Alternative: `LlmAdvisor` (Claude via `llm_client`).

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::CapabilityError;
use crate::llm_client::prompts::system_prompt;
use crate::llm_client::LlmClient;
use crate::models::profile::ProfileContext;
use crate::models::record::QuestionRecord;
use crate::report::prompts::{ADVICE_PROMPT_TEMPLATE, ADVICE_TASK};

const ADVICE_TEMPERATURE: f32 = 0.4;
/// Below this mean the advice targets fundamentals rather than polish.
const FUNDAMENTALS_THRESHOLD: f64 = 30.0;

/// The recommendation capability.
///
/// `records` are the history entries tagged with `skill`.
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn recommend(
        &self,
        skill: &str,
        mean_score: f64,
        records: &[QuestionRecord],
        profile: &ProfileContext,
    ) -> Result<String, CapabilityError>;

    /// "rules" | "llm"
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// RuleBasedAdvisor
// ────────────────────────────────────────────────────────────────────────────

pub struct RuleBasedAdvisor;

#[async_trait]
impl Advisor for RuleBasedAdvisor {
    async fn recommend(
        &self,
        skill: &str,
        mean_score: f64,
        records: &[QuestionRecord],
        _profile: &ProfileContext,
    ) -> Result<String, CapabilityError> {
        Ok(templated_advice(skill, mean_score, records))
    }

    fn backend(&self) -> &'static str {
        "rules"
    }
}

/// Deterministic advice keyed on the weakest averaged dimension.
pub fn templated_advice(skill: &str, mean_score: f64, records: &[QuestionRecord]) -> String {
    if mean_score < FUNDAMENTALS_THRESHOLD {
        return format!(
            "Rebuild your {skill} fundamentals: review the core concepts, then practise \
             explaining each one aloud in under two minutes."
        );
    }

    match weakest_dimension(records) {
        Some("accuracy") => format!(
            "Review the {skill} concepts you were unsure of and check your explanations \
             against authoritative documentation."
        ),
        Some("clarity") => format!(
            "Practise structured {skill} answers: state your approach, walk through the steps, \
             then summarise the outcome."
        ),
        Some("relevance") => format!(
            "Keep {skill} answers anchored to the question asked; restate it in one line \
             before you answer."
        ),
        Some("time_efficiency") => format!(
            "Time yourself on {skill} questions and aim to land the key point within the \
             first minute."
        ),
        _ => format!(
            "Prepare two concrete {skill} stories with measurable results and the trade-offs \
             you made, and use them to add depth."
        ),
    }
}

fn weakest_dimension(records: &[QuestionRecord]) -> Option<&'static str> {
    if records.is_empty() {
        return None;
    }
    let n = records.len() as f64;
    let mean = |f: fn(&QuestionRecord) -> f64| records.iter().map(f).sum::<f64>() / n;

    let dimensions = [
        ("accuracy", mean(|r| r.scores.accuracy)),
        ("clarity", mean(|r| r.scores.clarity)),
        ("depth", mean(|r| r.scores.depth)),
        ("relevance", mean(|r| r.scores.relevance)),
        ("time_efficiency", mean(|r| r.scores.time_efficiency)),
    ];
    dimensions
        .iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(name, _)| *name)
}

// ────────────────────────────────────────────────────────────────────────────
// LlmAdvisor
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmAdvisor(pub LlmClient);

#[derive(Debug, Deserialize)]
struct AdvicePayload {
    recommendation: String,
}

#[async_trait]
impl Advisor for LlmAdvisor {
    async fn recommend(
        &self,
        skill: &str,
        mean_score: f64,
        records: &[QuestionRecord],
        profile: &ProfileContext,
    ) -> Result<String, CapabilityError> {
        let prompt = build_advice_prompt(skill, mean_score, records, profile);
        let payload: AdvicePayload = self
            .0
            .call_json(&prompt, &system_prompt(ADVICE_TASK), ADVICE_TEMPERATURE)
            .await?;

        let text = payload.recommendation.trim();
        if text.is_empty() {
            return Err(CapabilityError::InvalidOutput(
                "recommendation was empty".to_string(),
            ));
        }
        Ok(text.to_string())
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

fn build_advice_prompt(
    skill: &str,
    mean_score: f64,
    records: &[QuestionRecord],
    profile: &ProfileContext,
) -> String {
    let summaries = records
        .iter()
        .map(|r| {
            format!(
                "- [{:.0}/100] {}{}",
                r.composite_score,
                r.question.text,
                r.feedback
                    .as_deref()
                    .map(|f| format!(" (feedback: {f})"))
                    .unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    ADVICE_PROMPT_TEMPLATE
        .replace("{role}", &profile.target_role)
        .replace("{skill}", skill)
        .replace("{mean_score}", &format!("{mean_score:.0}"))
        .replace("{question_summaries}", &summaries)
}

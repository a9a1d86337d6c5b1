//! Answer evaluation: scores an answer on accuracy, clarity, depth and
//! relevance. Time efficiency is derived by the session, not here.
//!
//! Two interchangeable backends implement `AnswerEvaluator`:
//! `RuleBasedEvaluator` (deterministic heuristics, no I/O) and
//! `LlmEvaluator` (Claude via `llm_client`). Sessions hold an
//! `Arc<dyn AnswerEvaluator>` and never know which one is active.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::CapabilityError;
use crate::models::profile::ProfileContext;
use crate::models::question::Question;
use crate::models::record::clamp_score;

pub mod llm;
pub mod prompts;
pub mod rule_based;

pub use llm::LlmEvaluator;
pub use rule_based::RuleBasedEvaluator;

/// Evaluator-owned dimensions, each in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub accuracy: f64,
    pub clarity: f64,
    pub depth: f64,
    pub relevance: f64,
    /// One sentence of actionable feedback, if the backend produced one.
    #[serde(default)]
    pub feedback: Option<String>,
    /// Backend that produced this evaluation when it differs from the
    /// configured one (set by the fallback wrapper).
    #[serde(skip)]
    pub answered_by: Option<&'static str>,
}

impl Evaluation {
    /// Zero on every dimension; used for empty answers by both backends.
    pub fn empty() -> Self {
        Self {
            accuracy: 0.0,
            clarity: 0.0,
            depth: 0.0,
            relevance: 0.0,
            feedback: Some("No answer was given. Attempt every question, even briefly.".to_string()),
            answered_by: None,
        }
    }

    pub fn clamped(self) -> Self {
        Self {
            accuracy: clamp_score(self.accuracy),
            clarity: clamp_score(self.clarity),
            depth: clamp_score(self.depth),
            relevance: clamp_score(self.relevance),
            feedback: self.feedback.filter(|f| !f.trim().is_empty()),
            answered_by: self.answered_by,
        }
    }
}

/// The evaluation capability.
#[async_trait]
pub trait AnswerEvaluator: Send + Sync {
    async fn evaluate_answer(
        &self,
        question: &Question,
        answer_text: &str,
        profile: &ProfileContext,
    ) -> Result<Evaluation, CapabilityError>;

    /// "rules" | "llm", recorded on each question record for transparency.
    fn backend(&self) -> &'static str;
}

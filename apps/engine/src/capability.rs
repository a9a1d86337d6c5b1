//! Capability wiring: which generator, evaluator and advisor a session uses.
//!
//! The LLM backends are wrapped in `WithFallback` so a failed call is logged
//! and answered by the rule-based variant instead. One fallback call, no retry.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::{CapabilityBackend, Config};
use crate::errors::CapabilityError;
use crate::evaluation::{AnswerEvaluator, Evaluation, LlmEvaluator, RuleBasedEvaluator};
use crate::llm_client::LlmClient;
use crate::models::profile::ProfileContext;
use crate::models::question::Question;
use crate::models::record::QuestionRecord;
use crate::question_bank::{
    LlmQuestionGenerator, QuestionGenerator, QuestionRequest, RuleBasedGenerator,
};
use crate::report::advisor::{Advisor, LlmAdvisor, RuleBasedAdvisor};

/// The three capabilities a session depends on.
#[derive(Clone)]
pub struct Capabilities {
    pub generator: Arc<dyn QuestionGenerator>,
    pub evaluator: Arc<dyn AnswerEvaluator>,
    pub advisor: Arc<dyn Advisor>,
}

impl Capabilities {
    /// Deterministic, offline capabilities.
    pub fn rule_based() -> Self {
        Self {
            generator: Arc::new(RuleBasedGenerator),
            evaluator: Arc::new(RuleBasedEvaluator),
            advisor: Arc::new(RuleBasedAdvisor),
        }
    }

    /// LLM-backed capabilities, each falling back to its rule-based variant.
    pub fn llm(client: LlmClient) -> Self {
        let rules = Self::rule_based();
        Self {
            generator: Arc::new(WithFallback::new(
                Arc::new(LlmQuestionGenerator(client.clone())) as Arc<dyn QuestionGenerator>,
                rules.generator,
            )),
            evaluator: Arc::new(WithFallback::new(
                Arc::new(LlmEvaluator(client.clone())) as Arc<dyn AnswerEvaluator>,
                rules.evaluator,
            )),
            advisor: Arc::new(WithFallback::new(
                Arc::new(LlmAdvisor(client)) as Arc<dyn Advisor>,
                rules.advisor,
            )),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        match config.backend {
            CapabilityBackend::Rules => {
                info!("Using rule-based capabilities");
                Ok(Self::rule_based())
            }
            CapabilityBackend::Llm => {
                let api_key = config
                    .anthropic_api_key
                    .clone()
                    .context("ANTHROPIC_API_KEY is required for the llm backend")?;
                let client =
                    LlmClient::new(api_key, Duration::from_secs(config.llm_timeout_seconds))
                        .context("Failed to build LLM HTTP client")?;
                info!("Using LLM capabilities with rule-based fallback");
                Ok(Self::llm(client))
            }
        }
    }
}

/// Routes each call to `primary`, answering from `fallback` if it fails.
pub struct WithFallback<T: ?Sized> {
    primary: Arc<T>,
    fallback: Arc<T>,
}

impl<T: ?Sized> WithFallback<T> {
    pub fn new(primary: Arc<T>, fallback: Arc<T>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl QuestionGenerator for WithFallback<dyn QuestionGenerator> {
    async fn generate_question(
        &self,
        request: &QuestionRequest<'_>,
    ) -> Result<Option<Question>, CapabilityError> {
        match self.primary.generate_question(request).await {
            Ok(question) => Ok(question),
            Err(e) => {
                warn!(
                    "Question generator '{}' failed, falling back to '{}': {}",
                    self.primary.backend(),
                    self.fallback.backend(),
                    e
                );
                self.fallback.generate_question(request).await
            }
        }
    }

    fn backend(&self) -> &'static str {
        self.primary.backend()
    }
}

#[async_trait]
impl AnswerEvaluator for WithFallback<dyn AnswerEvaluator> {
    async fn evaluate_answer(
        &self,
        question: &Question,
        answer_text: &str,
        profile: &ProfileContext,
    ) -> Result<Evaluation, CapabilityError> {
        match self.primary.evaluate_answer(question, answer_text, profile).await {
            Ok(evaluation) => Ok(evaluation),
            Err(e) => {
                warn!(
                    "Evaluator '{}' failed, falling back to '{}': {}",
                    self.primary.backend(),
                    self.fallback.backend(),
                    e
                );
                let evaluation = self
                    .fallback
                    .evaluate_answer(question, answer_text, profile)
                    .await?;
                let answered_by = evaluation.answered_by.unwrap_or(self.fallback.backend());
                Ok(Evaluation {
                    answered_by: Some(answered_by),
                    ..evaluation
                })
            }
        }
    }

    fn backend(&self) -> &'static str {
        self.primary.backend()
    }
}

#[async_trait]
impl Advisor for WithFallback<dyn Advisor> {
    async fn recommend(
        &self,
        skill: &str,
        mean_score: f64,
        records: &[QuestionRecord],
        profile: &ProfileContext,
    ) -> Result<String, CapabilityError> {
        match self.primary.recommend(skill, mean_score, records, profile).await {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(
                    "Advisor '{}' failed for '{}', falling back to '{}': {}",
                    self.primary.backend(),
                    skill,
                    self.fallback.backend(),
                    e
                );
                self.fallback.recommend(skill, mean_score, records, profile).await
            }
        }
    }

    fn backend(&self) -> &'static str {
        self.primary.backend()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{Difficulty, QuestionType};
    use crate::question_bank::FilterTier;
    use crate::testing::{FailingAdvisor, FailingEvaluator, FailingGenerator};

    fn profile() -> ProfileContext {
        ProfileContext::new("Data Engineer", ["Python", "SQL"], ["SQL"])
    }

    #[tokio::test]
    async fn test_generator_falls_back_once() {
        let generator = WithFallback::new(
            Arc::new(FailingGenerator) as Arc<dyn QuestionGenerator>,
            Arc::new(RuleBasedGenerator) as Arc<dyn QuestionGenerator>,
        );
        let profile = profile();
        let request = QuestionRequest {
            kind: QuestionType::Technical,
            difficulty: Difficulty::Medium,
            tier: FilterTier::Strict,
            profile: &profile,
            asked: &[],
        };
        let question = generator.generate_question(&request).await.unwrap();
        assert!(question.is_some());
    }

    #[tokio::test]
    async fn test_evaluator_falls_back_to_rules() {
        let evaluator = WithFallback::new(
            Arc::new(FailingEvaluator) as Arc<dyn AnswerEvaluator>,
            Arc::new(RuleBasedEvaluator) as Arc<dyn AnswerEvaluator>,
        );
        let question = Question::new("What is SQL?", QuestionType::Conceptual, Difficulty::Easy, ["SQL"]);
        let evaluation = evaluator
            .evaluate_answer(&question, "SQL is a query language for relational data.", &profile())
            .await
            .unwrap();
        assert!(evaluation.relevance > 0.0);
        assert_eq!(evaluator.backend(), "failing");
        assert_eq!(evaluation.answered_by, Some("rules"));
    }

    #[tokio::test]
    async fn test_primary_evaluation_is_not_relabelled() {
        let evaluator = WithFallback::new(
            Arc::new(RuleBasedEvaluator) as Arc<dyn AnswerEvaluator>,
            Arc::new(FailingEvaluator) as Arc<dyn AnswerEvaluator>,
        );
        let question = Question::new("What is SQL?", QuestionType::Conceptual, Difficulty::Easy, ["SQL"]);
        let evaluation = evaluator
            .evaluate_answer(&question, "A query language.", &profile())
            .await
            .unwrap();
        assert_eq!(evaluation.answered_by, None);
    }

    #[tokio::test]
    async fn test_fallback_errors_are_returned_when_both_fail() {
        let advisor = WithFallback::new(
            Arc::new(FailingAdvisor) as Arc<dyn Advisor>,
            Arc::new(FailingAdvisor) as Arc<dyn Advisor>,
        );
        let result = advisor.recommend("SQL", 20.0, &[], &profile()).await;
        assert!(matches!(result, Err(CapabilityError::Unavailable(_))));
    }

    #[test]
    fn test_from_config_selects_backend() {
        let rules = Config::from_lookup(|_| None).unwrap();
        let caps = Capabilities::from_config(&rules).unwrap();
        assert_eq!(caps.generator.backend(), "rules");
        assert_eq!(caps.evaluator.backend(), "rules");

        let llm = Config::from_lookup(|key| match key {
            "CAPABILITY_BACKEND" => Some("llm".to_string()),
            "ANTHROPIC_API_KEY" => Some("sk-test".to_string()),
            _ => None,
        })
        .unwrap();
        let caps = Capabilities::from_config(&llm).unwrap();
        assert_eq!(caps.generator.backend(), "llm");
        assert_eq!(caps.advisor.backend(), "llm");
    }
}

//! Test doubles shared by the session, capability and report tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::capability::{Capabilities, WithFallback};
use crate::errors::CapabilityError;
use crate::evaluation::{AnswerEvaluator, Evaluation, RuleBasedEvaluator};
use crate::models::profile::ProfileContext;
use crate::models::question::Question;
use crate::models::record::QuestionRecord;
use crate::question_bank::{QuestionGenerator, QuestionRequest, RuleBasedGenerator};
use crate::report::advisor::{Advisor, RuleBasedAdvisor};

/// Scores every dimension with the next scripted value; repeats the last one
/// once the script runs out.
pub struct ScriptedEvaluator {
    scores: Mutex<VecDeque<f64>>,
    last: Mutex<f64>,
}

impl ScriptedEvaluator {
    pub fn new(scores: &[f64]) -> Self {
        Self {
            scores: Mutex::new(scores.iter().copied().collect()),
            last: Mutex::new(0.0),
        }
    }
}

#[async_trait]
impl AnswerEvaluator for ScriptedEvaluator {
    async fn evaluate_answer(
        &self,
        _question: &Question,
        _answer_text: &str,
        _profile: &ProfileContext,
    ) -> Result<Evaluation, CapabilityError> {
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.scores.lock().unwrap().pop_front() {
            *last = next;
        }
        let score = *last;
        Ok(Evaluation {
            accuracy: score,
            clarity: score,
            depth: score,
            relevance: score,
            feedback: Some(format!("scripted {score}")),
            answered_by: None,
        })
    }

    fn backend(&self) -> &'static str {
        "scripted"
    }
}

pub struct FailingGenerator;

#[async_trait]
impl QuestionGenerator for FailingGenerator {
    async fn generate_question(
        &self,
        _request: &QuestionRequest<'_>,
    ) -> Result<Option<Question>, CapabilityError> {
        Err(CapabilityError::Unavailable("generator offline".to_string()))
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

pub struct FailingEvaluator;

#[async_trait]
impl AnswerEvaluator for FailingEvaluator {
    async fn evaluate_answer(
        &self,
        _question: &Question,
        _answer_text: &str,
        _profile: &ProfileContext,
    ) -> Result<Evaluation, CapabilityError> {
        Err(CapabilityError::Unavailable("evaluator offline".to_string()))
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

pub struct FailingAdvisor;

#[async_trait]
impl Advisor for FailingAdvisor {
    async fn recommend(
        &self,
        _skill: &str,
        _mean_score: f64,
        _records: &[QuestionRecord],
        _profile: &ProfileContext,
    ) -> Result<String, CapabilityError> {
        Err(CapabilityError::Unavailable("advisor offline".to_string()))
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

/// Never has a question to offer.
pub struct EmptyGenerator;

#[async_trait]
impl QuestionGenerator for EmptyGenerator {
    async fn generate_question(
        &self,
        _request: &QuestionRequest<'_>,
    ) -> Result<Option<Question>, CapabilityError> {
        Ok(None)
    }

    fn backend(&self) -> &'static str {
        "empty"
    }
}

/// Rule-based questions and advice with scripted scores.
pub fn scripted_capabilities(scores: &[f64]) -> Capabilities {
    Capabilities {
        generator: Arc::new(RuleBasedGenerator),
        evaluator: Arc::new(ScriptedEvaluator::new(scores)),
        advisor: Arc::new(RuleBasedAdvisor),
    }
}

/// Every primary capability fails; the rule-based fallbacks answer.
pub fn failing_capabilities() -> Capabilities {
    Capabilities {
        generator: Arc::new(WithFallback::new(
            Arc::new(FailingGenerator) as Arc<dyn QuestionGenerator>,
            Arc::new(RuleBasedGenerator) as Arc<dyn QuestionGenerator>,
        )),
        evaluator: Arc::new(WithFallback::new(
            Arc::new(FailingEvaluator) as Arc<dyn AnswerEvaluator>,
            Arc::new(RuleBasedEvaluator) as Arc<dyn AnswerEvaluator>,
        )),
        advisor: Arc::new(WithFallback::new(
            Arc::new(FailingAdvisor) as Arc<dyn Advisor>,
            Arc::new(RuleBasedAdvisor) as Arc<dyn Advisor>,
        )),
    }
}

//! InterviewSession: the state machine that drives one mock interview.
//!
//! Flow per question: next_question → submit_answer (evaluate → score →
//! termination check → difficulty update) → repeat until a terminal status.
//!
//! Operations take `&mut self`, so one session is driven by one caller at a
//! time. Capability calls are awaited before the session moves on.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::capability::Capabilities;
use crate::config::InterviewConfig;
use crate::errors::InterviewError;
use crate::interview::difficulty::next_difficulty;
use crate::interview::scoring::{build_score_vector, composite_score};
use crate::interview::termination;
use crate::models::profile::ProfileContext;
use crate::models::question::{Answer, Difficulty, Question, QuestionType};
use crate::models::record::{QuestionRecord, SessionStatus};
use crate::question_bank::select_question;

pub struct InterviewSession {
    id: Uuid,
    profile: ProfileContext,
    config: InterviewConfig,
    capabilities: Capabilities,
    history: Vec<QuestionRecord>,
    current_difficulty: Difficulty,
    status: SessionStatus,
    /// Issued by `next_question` and not yet answered.
    pending: Option<Question>,
    started_at: DateTime<Utc>,
}

impl InterviewSession {
    /// Validates `config` and opens a session at Medium difficulty.
    pub fn start(
        profile: ProfileContext,
        config: InterviewConfig,
        capabilities: Capabilities,
    ) -> Result<Self, InterviewError> {
        config.validate()?;

        let session = Self {
            id: Uuid::new_v4(),
            profile,
            config,
            capabilities,
            history: Vec::new(),
            current_difficulty: Difficulty::default(),
            status: SessionStatus::InProgress,
            pending: None,
            started_at: Utc::now(),
        };

        info!(
            "Session {} started for '{}' (min={}, max={}, generator={}, evaluator={})",
            session.id,
            session.profile.target_role,
            session.config.min_questions,
            session.config.max_questions,
            session.capabilities.generator.backend(),
            session.capabilities.evaluator.backend(),
        );
        Ok(session)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Operations
    // ────────────────────────────────────────────────────────────────────────

    /// Issues the next question. Its type follows the fixed rotation; its
    /// difficulty is the session's current difficulty unless the filters had
    /// to be relaxed.
    pub async fn next_question(&mut self) -> Result<&Question, InterviewError> {
        self.ensure_in_progress("next_question")?;
        if let Some(pending) = &self.pending {
            return Err(InterviewError::Sequence(format!(
                "question {} is still awaiting an answer",
                pending.id
            )));
        }

        let kind = QuestionType::for_index(self.history.len());
        let asked: Vec<Question> = self.history.iter().map(|r| r.question.clone()).collect();

        let (question, tier) = select_question(
            self.capabilities.generator.as_ref(),
            kind,
            self.current_difficulty,
            &self.profile,
            &asked,
        )
        .await?;

        info!(
            "Session {}: question {} ({} / {}, {:?} tier)",
            self.id,
            self.history.len() + 1,
            question.kind,
            question.difficulty,
            tier
        );
        Ok(&*self.pending.insert(question))
    }

    /// Scores the answer to the outstanding question and advances the session.
    ///
    /// A validation failure leaves the question outstanding so the caller can
    /// resubmit.
    pub async fn submit_answer(
        &mut self,
        question_id: Uuid,
        answer_text: &str,
        elapsed_seconds: f64,
    ) -> Result<&QuestionRecord, InterviewError> {
        self.ensure_in_progress("submit_answer")?;

        let question = match &self.pending {
            None => {
                return Err(InterviewError::Sequence(
                    "no question is outstanding; call next_question first".to_string(),
                ))
            }
            Some(q) if q.id != question_id => {
                return Err(InterviewError::Sequence(format!(
                    "answer targets question {question_id} but the outstanding question is {}",
                    q.id
                )))
            }
            Some(q) => q,
        };

        if !elapsed_seconds.is_finite() || elapsed_seconds < 0.0 {
            return Err(InterviewError::Validation(format!(
                "elapsed_seconds must be a finite, non-negative number, got {elapsed_seconds}"
            )));
        }

        let limit = self.config.question_time_limit_seconds;
        let within_limit = elapsed_seconds <= f64::from(limit);
        let answer = Answer {
            text: answer_text.to_string(),
            elapsed_seconds,
            submitted: within_limit || !answer_text.trim().is_empty(),
        };

        let evaluator = &self.capabilities.evaluator;
        let evaluation = evaluator
            .evaluate_answer(question, &answer.text, &self.profile)
            .await?;

        let scores = build_score_vector(&evaluation, elapsed_seconds, limit, answer.submitted);
        let composite = composite_score(&scores, &self.config.score_weights);

        let Some(question) = self.pending.take() else {
            return Err(InterviewError::Sequence(
                "outstanding question disappeared during evaluation".to_string(),
            ));
        };

        let record = QuestionRecord {
            question,
            answer,
            scores,
            composite_score: composite,
            difficulty_at_ask: self.current_difficulty,
            feedback: evaluation.feedback,
            evaluator_backend: evaluation
                .answered_by
                .unwrap_or(evaluator.backend())
                .to_string(),
        };
        let index = self.history.len();
        self.history.push(record);

        let composites: Vec<f64> = self.history.iter().map(|r| r.composite_score).collect();
        self.status = termination::evaluate(&composites, &self.config);

        if self.status == SessionStatus::InProgress {
            let next = next_difficulty(self.current_difficulty, composite);
            if next != self.current_difficulty {
                debug!(
                    "Session {}: difficulty {} → {} after composite {:.1}",
                    self.id, self.current_difficulty, next, composite
                );
            }
            self.current_difficulty = next;
        }

        info!(
            "Session {}: answer {} scored {:.1} (elapsed {:.0}s), status {:?}",
            self.id,
            index + 1,
            composite,
            elapsed_seconds,
            self.status
        );
        Ok(&self.history[index])
    }

    /// Ends the session. Any unanswered question is dropped; an in-progress
    /// session becomes CompletedNormally. Safe to call repeatedly.
    pub fn finish(&mut self) -> SessionStatus {
        if let Some(dropped) = self.pending.take() {
            debug!("Session {}: discarding unanswered question {}", self.id, dropped.id);
        }
        if self.status == SessionStatus::InProgress {
            self.status = SessionStatus::CompletedNormally;
            info!(
                "Session {} finished after {} questions",
                self.id,
                self.history.len()
            );
        }
        self.status
    }

    fn ensure_in_progress(&self, operation: &str) -> Result<(), InterviewError> {
        if self.status.is_terminal() {
            return Err(InterviewError::Sequence(format!(
                "{operation} called on a session that is already {:?}",
                self.status
            )));
        }
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────────
    // Accessors
    // ────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn history(&self) -> &[QuestionRecord] {
        &self.history
    }

    pub fn current_difficulty(&self) -> Difficulty {
        self.current_difficulty
    }

    pub fn question_count(&self) -> usize {
        self.history.len()
    }

    pub fn pending_question(&self) -> Option<&Question> {
        self.pending.as_ref()
    }

    pub fn profile(&self) -> &ProfileContext {
        &self.profile
    }

    pub fn config(&self) -> &InterviewConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

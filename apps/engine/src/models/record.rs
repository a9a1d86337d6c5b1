use serde::{Deserialize, Serialize};

use crate::models::question::{Answer, Difficulty, Question};

/// The five scoring dimensions, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    pub accuracy: f64,
    pub clarity: f64,
    pub depth: f64,
    pub relevance: f64,
    pub time_efficiency: f64,
}

impl ScoreVector {
    /// Builds a vector with every dimension clamped to `[0, 100]`.
    pub fn new(accuracy: f64, clarity: f64, depth: f64, relevance: f64, time_efficiency: f64) -> Self {
        Self {
            accuracy: clamp_score(accuracy),
            clarity: clamp_score(clarity),
            depth: clamp_score(depth),
            relevance: clamp_score(relevance),
            time_efficiency: clamp_score(time_efficiency),
        }
    }
}

/// Clamps to `[0, 100]`, mapping NaN to 0.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    CompletedNormally,
    TerminatedEarly,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::InProgress)
    }
}

/// One asked-and-scored question. Appended once to the session history and
/// never modified afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: Question,
    pub answer: Answer,
    pub scores: ScoreVector,
    pub composite_score: f64,
    pub difficulty_at_ask: Difficulty,
    pub feedback: Option<String>,
    /// Backend that actually scored the answer ("rules", "llm", ...).
    pub evaluator_backend: String,
}

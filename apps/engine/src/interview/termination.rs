//! Termination policy evaluated after every scored question.

use crate::config::InterviewConfig;
use crate::models::record::SessionStatus;

/// Mean of the last `window` scores, or `None` if fewer are available.
pub fn trailing_average(scores: &[f64], window: usize) -> Option<f64> {
    if window == 0 || scores.len() < window {
        return None;
    }
    let tail = &scores[scores.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

/// Status after `composites.len()` scored questions.
///
/// MAX_QUESTIONS is a hard ceiling and wins over the trailing-average check.
/// The trailing-average check may fire before MIN_QUESTIONS is reached.
pub fn evaluate(composites: &[f64], config: &InterviewConfig) -> SessionStatus {
    let count = composites.len();

    if count >= config.max_questions {
        return SessionStatus::CompletedNormally;
    }

    match trailing_average(composites, config.trailing_window) {
        Some(avg) if avg < config.early_termination_threshold => SessionStatus::TerminatedEarly,
        _ => SessionStatus::InProgress,
    }
}

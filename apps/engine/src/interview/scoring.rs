//! Per-question scoring: time efficiency, overtime credit rules and the
//! weighted composite.

use serde::{Deserialize, Serialize};

use crate::errors::InterviewError;
use crate::evaluation::Evaluation;
use crate::models::record::{clamp_score, ScoreVector};

/// Time efficiency at exactly the limit (`r == 1`).
const AT_LIMIT_EFFICIENCY: f64 = 70.0;
/// Linear penalty per unit of `r` inside the limit (`100 × 0.3`).
const IN_TIME_SLOPE: f64 = 30.0;
/// Linear penalty per unit of `r` past the limit.
const OVERTIME_SLOPE: f64 = 40.0;

/// Raw dimension weights. Normalised to sum to 1 before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub accuracy: f64,
    pub clarity: f64,
    pub depth: f64,
    pub relevance: f64,
    pub time_efficiency: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            accuracy: 1.0,
            clarity: 1.0,
            depth: 1.0,
            relevance: 1.0,
            time_efficiency: 1.0,
        }
    }
}

impl ScoreWeights {
    fn as_array(&self) -> [f64; 5] {
        [
            self.accuracy,
            self.clarity,
            self.depth,
            self.relevance,
            self.time_efficiency,
        ]
    }

    pub fn validate(&self) -> Result<(), InterviewError> {
        let weights = self.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(InterviewError::Config(format!(
                "score weights must be finite and non-negative, got {self:?}"
            )));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(InterviewError::Config(
                "score weights must have a positive sum".to_string(),
            ));
        }
        Ok(())
    }

    /// Weights scaled to sum to 1. Callers validate first.
    pub fn normalized(&self) -> ScoreWeights {
        let total: f64 = self.as_array().iter().sum();
        if total <= 0.0 {
            return ScoreWeights::default().normalized();
        }
        ScoreWeights {
            accuracy: self.accuracy / total,
            clarity: self.clarity / total,
            depth: self.depth / total,
            relevance: self.relevance / total,
            time_efficiency: self.time_efficiency / total,
        }
    }
}

/// `r = elapsed / limit`; `100 × (1 − 0.3r)` inside the limit, then
/// `max(0, 70 − 40(r − 1))` once overtime.
pub fn time_efficiency(elapsed_seconds: f64, time_limit_seconds: u32) -> f64 {
    let limit = f64::from(time_limit_seconds.max(1));
    let r = elapsed_seconds.max(0.0) / limit;

    if r <= 1.0 {
        100.0 - IN_TIME_SLOPE * r
    } else {
        (AT_LIMIT_EFFICIENCY - OVERTIME_SLOPE * (r - 1.0)).max(0.0)
    }
}

/// Combines evaluator output with the derived time dimension.
///
/// Overtime answers that were not submitted, or whose time efficiency has
/// fallen to zero, earn no accuracy or depth credit. Clarity and relevance
/// stay as evaluated.
pub fn build_score_vector(
    evaluation: &Evaluation,
    elapsed_seconds: f64,
    time_limit_seconds: u32,
    submitted: bool,
) -> ScoreVector {
    let time_eff = time_efficiency(elapsed_seconds, time_limit_seconds);
    let overtime = elapsed_seconds > f64::from(time_limit_seconds);
    let no_credit = overtime && (!submitted || time_eff <= 0.0);

    let (accuracy, depth) = if no_credit {
        (0.0, 0.0)
    } else {
        (evaluation.accuracy, evaluation.depth)
    };

    ScoreVector::new(
        accuracy,
        evaluation.clarity,
        depth,
        evaluation.relevance,
        time_eff,
    )
}

/// Weighted average of the five dimensions, clamped to `[0, 100]`.
pub fn composite_score(scores: &ScoreVector, weights: &ScoreWeights) -> f64 {
    let w = weights.normalized();
    clamp_score(
        scores.accuracy * w.accuracy
            + scores.clarity * w.clarity
            + scores.depth * w.depth
            + scores.relevance * w.relevance
            + scores.time_efficiency * w.time_efficiency,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(accuracy: f64, clarity: f64, depth: f64, relevance: f64) -> Evaluation {
        Evaluation {
            accuracy,
            clarity,
            depth,
            relevance,
            feedback: None,
            answered_by: None,
        }
    }

    #[test]
    fn test_time_efficiency_inside_limit() {
        assert_eq!(time_efficiency(0.0, 180), 100.0);
        assert!((time_efficiency(90.0, 180) - 85.0).abs() < 1e-9);
        assert!((time_efficiency(180.0, 180) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_efficiency_overtime_reaches_zero() {
        // r = 2 → 70 − 40 = 30
        assert!((time_efficiency(360.0, 180) - 30.0).abs() < 1e-9);
        // r = 2.75 → 0
        assert!(time_efficiency(495.0, 180).abs() < 1e-9);
        // r = 3 → floored at 0
        assert_eq!(time_efficiency(540.0, 180), 0.0);
    }

    #[test]
    fn test_time_efficiency_is_non_increasing_in_elapsed() {
        let mut previous = f64::INFINITY;
        for elapsed in (0..=600).step_by(15) {
            let te = time_efficiency(elapsed as f64, 180);
            assert!(te <= previous, "not monotone at {elapsed}s");
            assert!((0.0..=100.0).contains(&te));
            previous = te;
        }
    }

    #[test]
    fn test_triple_limit_overtime_zeroes_accuracy_and_depth() {
        let scores = build_score_vector(&eval(90.0, 80.0, 85.0, 75.0), 540.0, 180, true);
        assert_eq!(scores.time_efficiency, 0.0);
        assert_eq!(scores.accuracy, 0.0);
        assert_eq!(scores.depth, 0.0);
        assert_eq!(scores.clarity, 80.0);
        assert_eq!(scores.relevance, 75.0);
    }

    #[test]
    fn test_unsubmitted_overtime_gets_no_credit() {
        let scores = build_score_vector(&eval(60.0, 10.0, 60.0, 10.0), 200.0, 180, false);
        assert_eq!(scores.accuracy, 0.0);
        assert_eq!(scores.depth, 0.0);
        assert!(scores.time_efficiency > 0.0);
    }

    #[test]
    fn test_mild_overtime_with_answer_keeps_credit() {
        let scores = build_score_vector(&eval(60.0, 50.0, 70.0, 40.0), 200.0, 180, true);
        assert_eq!(scores.accuracy, 60.0);
        assert_eq!(scores.depth, 70.0);
    }

    #[test]
    fn test_composite_with_equal_weights_is_mean() {
        let v = ScoreVector::new(100.0, 80.0, 60.0, 40.0, 20.0);
        assert!((composite_score(&v, &ScoreWeights::default()) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_composite_bounded_and_monotone_per_dimension() {
        let weights = ScoreWeights {
            accuracy: 0.30,
            clarity: 0.20,
            depth: 0.25,
            relevance: 0.15,
            time_efficiency: 0.10,
        };
        let grid = [0.0, 25.0, 50.0, 75.0, 100.0];
        for &base in &grid {
            for dim in 0..5 {
                let mut previous = -1.0;
                for &value in &grid {
                    let mut dims = [base; 5];
                    dims[dim] = value;
                    let v = ScoreVector::new(dims[0], dims[1], dims[2], dims[3], dims[4]);
                    let c = composite_score(&v, &weights);
                    assert!((0.0..=100.0).contains(&c));
                    assert!(c >= previous, "dimension {dim} not monotone");
                    previous = c;
                }
            }
        }
    }

    #[test]
    fn test_weights_normalize_to_one() {
        let w = ScoreWeights {
            accuracy: 3.0,
            clarity: 2.0,
            depth: 2.5,
            relevance: 1.5,
            time_efficiency: 1.0,
        }
        .normalized();
        let sum = w.accuracy + w.clarity + w.depth + w.relevance + w.time_efficiency;
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((w.accuracy - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let negative = ScoreWeights {
            clarity: -1.0,
            ..ScoreWeights::default()
        };
        assert!(matches!(negative.validate(), Err(InterviewError::Config(_))));

        let zero = ScoreWeights {
            accuracy: 0.0,
            clarity: 0.0,
            depth: 0.0,
            relevance: 0.0,
            time_efficiency: 0.0,
        };
        assert!(matches!(zero.validate(), Err(InterviewError::Config(_))));
    }
}

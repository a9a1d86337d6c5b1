//! Difficulty adaptation. Stateless: the next level depends only on the
//! current level and the latest composite score.

use crate::models::question::Difficulty;

/// Composite at or above which the next question is one level harder.
pub const STEP_UP_THRESHOLD: f64 = 75.0;
/// Composite below which the next question is one level easier.
pub const STEP_DOWN_THRESHOLD: f64 = 45.0;

pub fn next_difficulty(current: Difficulty, latest_composite_score: f64) -> Difficulty {
    if latest_composite_score >= STEP_UP_THRESHOLD {
        current.step_up()
    } else if latest_composite_score < STEP_DOWN_THRESHOLD {
        current.step_down()
    } else {
        current
    }
}

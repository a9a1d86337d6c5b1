//! Report Builder: turns a finished session's history into the candidate
//! report (readiness, per-skill breakdown, strengths, weaknesses and advice).

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::InterviewError;
use crate::interview::InterviewSession;
use crate::models::question::{Difficulty, QuestionType};
use crate::models::record::{QuestionRecord, SessionStatus};

pub mod advisor;
pub mod prompts;

/// Skills at or above this mean are strengths.
pub const STRENGTH_THRESHOLD: f64 = 70.0;
/// Skills below this mean are weaknesses.
pub const WEAKNESS_THRESHOLD: f64 = 50.0;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiringIndicator {
    #[serde(rename = "Strong Yes")]
    StrongYes,
    Yes,
    Maybe,
    No,
}

impl HiringIndicator {
    pub fn from_readiness(readiness_score: u32) -> Self {
        if readiness_score >= 80 {
            HiringIndicator::StrongYes
        } else if readiness_score >= 65 {
            HiringIndicator::Yes
        } else if readiness_score >= 50 {
            HiringIndicator::Maybe
        } else {
            HiringIndicator::No
        }
    }
}

/// One row per answered question, in the order asked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub difficulty: Difficulty,
    pub composite_score: f64,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub session_id: Uuid,
    pub readiness_score: u32, // 0 – 100
    pub hiring_indicator: HiringIndicator,
    /// Mean composite per asked skill tag, one decimal.
    pub per_skill_breakdown: BTreeMap<String, f64>,
    pub strengths: Vec<String>,  // mean ≥ 70, best first
    pub weaknesses: Vec<String>, // mean < 50, worst first
    /// One entry per weakness, same order.
    pub recommendations: Vec<String>,
    pub status: SessionStatus,
    pub question_count: usize,
    pub met_minimum: bool,
    pub question_results: Vec<QuestionResult>,
    pub advisor_backend: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

/// Builds the report for a terminal session.
///
/// Recommendations come from the session's advisor capability.
pub async fn build(session: &InterviewSession) -> Result<Report, InterviewError> {
    if !session.status().is_terminal() {
        return Err(InterviewError::Sequence(
            "report requested before the session finished; call finish() first".to_string(),
        ));
    }

    let history = session.history();
    let readiness_score = readiness_score(history);
    let means = skill_means(history);
    let per_skill_breakdown = round_breakdown(&means);
    let (strengths, weaknesses) = classify_skills(&means);

    let advisor = &session.capabilities().advisor;
    let mut recommendations = Vec::with_capacity(weaknesses.len());
    for skill in &weaknesses {
        let mean = means.get(skill).copied().unwrap_or_default();
        let key = skill_key(skill);
        let records: Vec<QuestionRecord> = history
            .iter()
            .filter(|r| r.question.skill_tags.iter().any(|t| skill_key(t) == key))
            .cloned()
            .collect();
        recommendations.push(
            advisor
                .recommend(skill, mean, &records, session.profile())
                .await?,
        );
    }

    let question_results = history
        .iter()
        .map(|r| QuestionResult {
            question: r.question.text.clone(),
            kind: r.question.kind,
            difficulty: r.difficulty_at_ask,
            composite_score: r.composite_score,
            feedback: r.feedback.clone(),
        })
        .collect();

    let report = Report {
        session_id: session.id(),
        readiness_score,
        hiring_indicator: HiringIndicator::from_readiness(readiness_score),
        per_skill_breakdown,
        strengths,
        weaknesses,
        recommendations,
        status: session.status(),
        question_count: history.len(),
        met_minimum: history.len() >= session.config().min_questions,
        question_results,
        advisor_backend: advisor.backend().to_string(),
    };

    info!(
        "Report for session {}: readiness {} ({:?}), {} strengths, {} weaknesses",
        report.session_id,
        report.readiness_score,
        report.hiring_indicator,
        report.strengths.len(),
        report.weaknesses.len()
    );
    Ok(report)
}

/// Rounded mean composite; 0 when nothing was answered.
pub fn readiness_score(history: &[QuestionRecord]) -> u32 {
    if history.is_empty() {
        return 0;
    }
    let mean = history.iter().map(|r| r.composite_score).sum::<f64>() / history.len() as f64;
    mean.round().clamp(0.0, 100.0) as u32
}

/// Per-skill means rounded to one decimal, as shown in the report.
pub fn skill_breakdown(history: &[QuestionRecord]) -> BTreeMap<String, f64> {
    round_breakdown(&skill_means(history))
}

/// Mean composite for every skill tag that appears on at least one question.
///
/// Tags are grouped case-insensitively and reported under the first spelling
/// seen in the history.
pub fn skill_means(history: &[QuestionRecord]) -> BTreeMap<String, f64> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();

    for record in history {
        let mut counted = HashSet::new();
        for tag in &record.question.skill_tags {
            let key = skill_key(tag);
            if key.is_empty() || !counted.insert(key.clone()) {
                continue;
            }
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push((tag.trim().to_string(), Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(record.composite_score);
        }
    }

    groups
        .into_iter()
        .map(|(skill, values)| {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            (skill, mean)
        })
        .collect()
}

fn round_breakdown(means: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    means
        .iter()
        .map(|(skill, mean)| (skill.clone(), round_one_decimal(*mean)))
        .collect()
}

fn skill_key(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Strengths best first, weaknesses worst first; ties broken by name.
///
/// Expects unrounded means so the thresholds apply to the exact average.
pub fn classify_skills(breakdown: &BTreeMap<String, f64>) -> (Vec<String>, Vec<String>) {
    let mut strengths: Vec<(&String, f64)> = breakdown
        .iter()
        .filter(|(_, mean)| **mean >= STRENGTH_THRESHOLD)
        .map(|(skill, mean)| (skill, *mean))
        .collect();
    strengths.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut weaknesses: Vec<(&String, f64)> = breakdown
        .iter()
        .filter(|(_, mean)| **mean < WEAKNESS_THRESHOLD)
        .map(|(skill, mean)| (skill, *mean))
        .collect();
    weaknesses.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));

    (
        strengths.into_iter().map(|(s, _)| s.clone()).collect(),
        weaknesses.into_iter().map(|(s, _)| s.clone()).collect(),
    )
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capabilities;
    use crate::config::InterviewConfig;
    use crate::interview::scoring::ScoreWeights;
    use crate::models::profile::ProfileContext;
    use crate::models::question::{Answer, Question};
    use crate::models::record::ScoreVector;
    use crate::testing::{scripted_capabilities, EmptyGenerator};

    fn record(tags: &[&str], composite: f64) -> QuestionRecord {
        QuestionRecord {
            question: Question::new(
                format!("Question about {}", tags.join(" and ")),
                QuestionType::Technical,
                Difficulty::Medium,
                tags.iter().copied(),
            ),
            answer: Answer {
                text: "answer".to_string(),
                elapsed_seconds: 60.0,
                submitted: true,
            },
            scores: ScoreVector::new(composite, composite, composite, composite, composite),
            composite_score: composite,
            difficulty_at_ask: Difficulty::Medium,
            feedback: None,
            evaluator_backend: "rules".to_string(),
        }
    }

    #[test]
    fn test_skill_mean_across_questions() {
        let history = vec![record(&["SQL"], 90.0), record(&["SQL"], 60.0)];
        let breakdown = skill_breakdown(&history);
        assert_eq!(breakdown.get("SQL"), Some(&75.0));

        let (strengths, weaknesses) = classify_skills(&skill_means(&history));
        assert_eq!(strengths, vec!["SQL".to_string()]);
        assert!(weaknesses.is_empty());
    }

    #[test]
    fn test_thresholds_apply_to_unrounded_mean() {
        let history = vec![
            record(&["SQL"], 69.96),
            record(&["Go"], 49.96),
            record(&["Rust"], 70.0),
            record(&["Docker"], 50.0),
        ];
        let breakdown = skill_breakdown(&history);
        assert_eq!(breakdown.get("SQL"), Some(&70.0));
        assert_eq!(breakdown.get("Go"), Some(&50.0));

        let (strengths, weaknesses) = classify_skills(&skill_means(&history));
        assert_eq!(strengths, vec!["Rust"]);
        assert_eq!(weaknesses, vec!["Go"]);
    }

    #[test]
    fn test_tags_grouped_case_insensitively_under_first_spelling() {
        let history = vec![
            record(&["SQL"], 90.0),
            record(&["sql"], 60.0),
            record(&[" Sql "], 30.0),
        ];
        let breakdown = skill_breakdown(&history);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown.get("SQL"), Some(&60.0));
    }

    #[test]
    fn test_skill_below_strength_threshold_is_not_a_strength() {
        let history = vec![record(&["SQL"], 70.0), record(&["SQL"], 60.0)];
        let (strengths, weaknesses) = classify_skills(&skill_means(&history));
        assert!(strengths.is_empty());
        assert!(weaknesses.is_empty());
    }

    #[test]
    fn test_breakdown_rounds_to_one_decimal_and_omits_unasked_skills() {
        let history = vec![
            record(&["Rust"], 70.0),
            record(&["Rust"], 71.0),
            record(&["Rust"], 71.0),
        ];
        let breakdown = skill_breakdown(&history);
        assert_eq!(breakdown.get("Rust"), Some(&70.7));
        assert_eq!(breakdown.len(), 1);
    }

    #[test]
    fn test_classification_order_and_ties() {
        let breakdown: BTreeMap<String, f64> = [
            ("Go", 30.0),
            ("Kafka", 45.0),
            ("Docker", 30.0),
            ("Rust", 95.0),
            ("SQL", 80.0),
            ("Python", 60.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let (strengths, weaknesses) = classify_skills(&breakdown);
        assert_eq!(strengths, vec!["Rust", "SQL"]);
        assert_eq!(weaknesses, vec!["Docker", "Go", "Kafka"]);
    }

    #[test]
    fn test_readiness_is_rounded_mean() {
        let history = vec![record(&["A"], 80.0), record(&["B"], 65.0), record(&["C"], 66.0)];
        // mean 70.33
        assert_eq!(readiness_score(&history), 70);
        assert_eq!(readiness_score(&[]), 0);
    }

    #[test]
    fn test_hiring_indicator_bands() {
        assert_eq!(HiringIndicator::from_readiness(80), HiringIndicator::StrongYes);
        assert_eq!(HiringIndicator::from_readiness(79), HiringIndicator::Yes);
        assert_eq!(HiringIndicator::from_readiness(65), HiringIndicator::Yes);
        assert_eq!(HiringIndicator::from_readiness(50), HiringIndicator::Maybe);
        assert_eq!(HiringIndicator::from_readiness(49), HiringIndicator::No);
        assert_eq!(
            serde_json::to_string(&HiringIndicator::StrongYes).unwrap(),
            "\"Strong Yes\""
        );
    }

    fn profile() -> ProfileContext {
        ProfileContext::new("Backend Developer", ["SQL", "Kafka"], ["SQL", "Kafka"])
    }

    fn untimed(min: usize, max: usize) -> InterviewConfig {
        InterviewConfig {
            min_questions: min,
            max_questions: max,
            score_weights: ScoreWeights {
                time_efficiency: 0.0,
                ..ScoreWeights::default()
            },
            ..InterviewConfig::default()
        }
    }

    #[tokio::test]
    async fn test_report_requires_terminal_session() {
        let session =
            InterviewSession::start(profile(), InterviewConfig::default(), Capabilities::rule_based())
                .unwrap();
        assert!(matches!(build(&session).await, Err(InterviewError::Sequence(_))));
    }

    #[tokio::test]
    async fn test_report_after_early_termination() {
        let mut session = InterviewSession::start(
            profile(),
            untimed(3, 5),
            scripted_capabilities(&[30.0, 20.0]),
        )
        .unwrap();
        for text in ["first", "second"] {
            let id = session.next_question().await.unwrap().id;
            session.submit_answer(id, text, 20.0).await.unwrap();
        }
        assert_eq!(session.status(), SessionStatus::TerminatedEarly);

        let report = build(&session).await.unwrap();
        assert_eq!(report.readiness_score, 25);
        assert_eq!(report.hiring_indicator, HiringIndicator::No);
        assert_eq!(report.question_count, 2);
        assert!(!report.met_minimum);
        assert_eq!(report.question_results.len(), 2);
        assert!(!report.weaknesses.is_empty());
        assert_eq!(report.recommendations.len(), report.weaknesses.len());
        assert!(report.strengths.is_empty());
    }

    #[tokio::test]
    async fn test_report_for_exhausted_session_is_empty() {
        let mut capabilities = Capabilities::rule_based();
        capabilities.generator = std::sync::Arc::new(EmptyGenerator);
        let mut session =
            InterviewSession::start(profile(), InterviewConfig::default(), capabilities).unwrap();
        assert!(session.next_question().await.is_err());
        session.finish();

        let report = build(&session).await.unwrap();
        assert_eq!(report.readiness_score, 0);
        assert_eq!(report.status, SessionStatus::CompletedNormally);
        assert!(report.per_skill_breakdown.is_empty());
        assert!(report.recommendations.is_empty());
    }
}

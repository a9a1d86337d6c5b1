//! Heuristic evaluator: pure Rust, deterministic, no LLM call.
//!
//! Algorithm:
//! 1. Empty answer → all dimensions 0.
//! 2. depth   ← answer length, +10 for a concrete example marker
//! 3. clarity ← answer length band (rambling answers are capped), +5 per
//!    structure marker (max 2)
//! 4. relevance ← skill-tag coverage and overlap with the question's content
//!    words
//! 5. accuracy ← skill-tag coverage plus substance signals; very short
//!    answers are capped at 30

use std::collections::HashSet;

use async_trait::async_trait;

use crate::errors::CapabilityError;
use crate::evaluation::{AnswerEvaluator, Evaluation};
use crate::models::profile::ProfileContext;
use crate::models::question::Question;

const STOP_WORDS: &[&str] = &[
    "about", "after", "also", "been", "both", "could", "describe", "does", "explain", "from",
    "have", "into", "more", "over", "should", "tell", "than", "that", "their", "them", "then",
    "there", "these", "they", "this", "time", "using", "walk", "what", "when", "where", "which",
    "while", "with", "would", "your",
];

const EXAMPLE_MARKERS: &[&str] = &[
    "for example",
    "for instance",
    "e.g.",
    "such as",
    "in my last",
    "in my previous",
    "at my",
    "we built",
    "i built",
    "i used",
    "i led",
];

const STRUCTURE_MARKERS: &[&str] = &[
    "first", "second", "then", "finally", "because", "therefore", "however", "trade-off",
    "tradeoff", "in summary",
];

/// Answers shorter than this are capped on accuracy.
const MIN_SUBSTANTIVE_WORDS: usize = 5;

pub struct RuleBasedEvaluator;

#[async_trait]
impl AnswerEvaluator for RuleBasedEvaluator {
    async fn evaluate_answer(
        &self,
        question: &Question,
        answer_text: &str,
        _profile: &ProfileContext,
    ) -> Result<Evaluation, CapabilityError> {
        Ok(score_answer(question, answer_text))
    }

    fn backend(&self) -> &'static str {
        "rules"
    }
}

/// Scores an answer with the heuristics described in the module docs.
pub fn score_answer(question: &Question, answer_text: &str) -> Evaluation {
    let answer = answer_text.trim();
    if answer.is_empty() {
        return Evaluation::empty();
    }

    let lower = answer.to_lowercase();
    let answer_words = content_words(&lower);
    let word_count = answer.split_whitespace().count();
    let wc = word_count as f64;

    let tag_coverage = skill_tag_coverage(question, &lower);
    let overlap = question_overlap(&question.text, &answer_words);
    let has_example = EXAMPLE_MARKERS.iter().any(|m| lower.contains(m));
    let structure_hits = STRUCTURE_MARKERS
        .iter()
        .filter(|m| lower.contains(*m))
        .count()
        .min(2);

    let depth = if word_count > 10 { 30.0 + 2.0 * wc } else { 4.0 * wc }
        + if has_example { 10.0 } else { 0.0 };

    let clarity = if word_count <= 20 {
        30.0 + wc
    } else if word_count < 200 {
        40.0 + wc
    } else {
        60.0
    } + 5.0 * structure_hits as f64;

    let relevance = match tag_coverage {
        Some(coverage) => 30.0 + 45.0 * coverage + 25.0 * overlap,
        None => 40.0 + 60.0 * overlap,
    };

    let mut accuracy = 45.0
        + 25.0 * tag_coverage.unwrap_or(overlap)
        + if word_count >= 25 { 10.0 } else { 0.0 }
        + if has_example { 5.0 } else { 0.0 };
    if word_count < MIN_SUBSTANTIVE_WORDS {
        accuracy = accuracy.min(30.0);
    }

    let evaluation = Evaluation {
        accuracy,
        clarity,
        depth,
        relevance,
        feedback: None,
        answered_by: None,
    }
    .clamped();

    let feedback = feedback_for(&evaluation, question);
    Evaluation {
        feedback: Some(feedback),
        ..evaluation
    }
}

/// Fraction of the question's skill tags mentioned in the answer, or `None`
/// if the question carries no tags.
fn skill_tag_coverage(question: &Question, lower_answer: &str) -> Option<f64> {
    if question.skill_tags.is_empty() {
        return None;
    }
    let hits = question
        .skill_tags
        .iter()
        .filter(|tag| lower_answer.contains(&tag.to_lowercase()))
        .count();
    Some(hits as f64 / question.skill_tags.len() as f64)
}

/// Fraction of the question's content words that reappear in the answer.
fn question_overlap(question_text: &str, answer_words: &HashSet<String>) -> f64 {
    let question_words = content_words(&question_text.to_lowercase());
    if question_words.is_empty() {
        return 0.0;
    }
    let hits = question_words
        .iter()
        .filter(|w| answer_words.contains(*w))
        .count();
    hits as f64 / question_words.len() as f64
}

fn content_words(lower: &str) -> HashSet<String> {
    lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.len() > 3 && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Picks the weakest dimension and returns one sentence of advice for it.
fn feedback_for(evaluation: &Evaluation, question: &Question) -> String {
    let skill = question
        .skill_tags
        .iter()
        .next()
        .map(String::as_str)
        .unwrap_or("the topic");

    let dimensions = [
        ("accuracy", evaluation.accuracy),
        ("clarity", evaluation.clarity),
        ("depth", evaluation.depth),
        ("relevance", evaluation.relevance),
    ];
    let weakest = dimensions
        .iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(name, _)| *name)
        .unwrap_or("depth");

    match weakest {
        "accuracy" => format!(
            "Anchor your answer in the specific {skill} concepts the question targets."
        ),
        "clarity" => {
            "Structure the answer: state your approach, walk through the steps, then summarise."
                .to_string()
        }
        "relevance" => format!("Address the question directly and tie it back to {skill}."),
        _ => "Go deeper with a concrete example, the trade-offs involved, or measurable results."
            .to_string(),
    }
}

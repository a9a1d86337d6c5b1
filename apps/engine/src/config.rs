use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::errors::InterviewError;
use crate::interview::scoring::ScoreWeights;

/// Immutable parameters for one interview. Passed into `InterviewSession::start`
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewConfig {
    pub question_time_limit_seconds: u32,
    pub early_termination_threshold: f64,
    pub min_questions: usize,
    pub max_questions: usize,
    /// Number of most recent composites averaged for early termination.
    pub trailing_window: usize,
    pub score_weights: ScoreWeights,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            question_time_limit_seconds: 180,
            early_termination_threshold: 35.0,
            min_questions: 5,
            max_questions: 15,
            trailing_window: 2,
            score_weights: ScoreWeights::default(),
        }
    }
}

impl InterviewConfig {
    /// Rejects inconsistent bounds before any session starts.
    pub fn validate(&self) -> Result<(), InterviewError> {
        if self.question_time_limit_seconds == 0 {
            return Err(InterviewError::Config(
                "QUESTION_TIME_LIMIT_SECONDS must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.early_termination_threshold) {
            return Err(InterviewError::Config(format!(
                "EARLY_TERMINATION_THRESHOLD must be within [0, 100], got {}",
                self.early_termination_threshold
            )));
        }
        if self.min_questions < 1 {
            return Err(InterviewError::Config(
                "MIN_QUESTIONS must be at least 1".to_string(),
            ));
        }
        if self.min_questions > self.max_questions {
            return Err(InterviewError::Config(format!(
                "MIN_QUESTIONS ({}) exceeds MAX_QUESTIONS ({})",
                self.min_questions, self.max_questions
            )));
        }
        if self.trailing_window < 1 {
            return Err(InterviewError::Config(
                "TRAILING_WINDOW must be at least 1".to_string(),
            ));
        }
        self.score_weights.validate()
    }
}

/// Which implementation backs the generation / evaluation capabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityBackend {
    #[default]
    Rules,
    Llm,
}

impl FromStr for CapabilityBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "rules" | "rule_based" | "rule-based" => Ok(CapabilityBackend::Rules),
            "llm" | "ai" => Ok(CapabilityBackend::Llm),
            other => bail!("unknown capability backend '{other}' (expected 'rules' or 'llm')"),
        }
    }
}

/// Process configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub interview: InterviewConfig,
    pub backend: CapabilityBackend,
    pub anthropic_api_key: Option<String>,
    pub llm_timeout_seconds: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Missing keys
    /// take their defaults; present but unparseable keys are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = InterviewConfig::default();
        let weight_defaults = ScoreWeights::default();

        let interview = InterviewConfig {
            question_time_limit_seconds: parse_or(
                &lookup,
                "QUESTION_TIME_LIMIT_SECONDS",
                defaults.question_time_limit_seconds,
            )?,
            early_termination_threshold: parse_or(
                &lookup,
                "EARLY_TERMINATION_THRESHOLD",
                defaults.early_termination_threshold,
            )?,
            min_questions: parse_or(&lookup, "MIN_QUESTIONS", defaults.min_questions)?,
            max_questions: parse_or(&lookup, "MAX_QUESTIONS", defaults.max_questions)?,
            trailing_window: parse_or(&lookup, "TRAILING_WINDOW", defaults.trailing_window)?,
            score_weights: ScoreWeights {
                accuracy: parse_or(&lookup, "SCORE_WEIGHT_ACCURACY", weight_defaults.accuracy)?,
                clarity: parse_or(&lookup, "SCORE_WEIGHT_CLARITY", weight_defaults.clarity)?,
                depth: parse_or(&lookup, "SCORE_WEIGHT_DEPTH", weight_defaults.depth)?,
                relevance: parse_or(&lookup, "SCORE_WEIGHT_RELEVANCE", weight_defaults.relevance)?,
                time_efficiency: parse_or(
                    &lookup,
                    "SCORE_WEIGHT_TIME_EFFICIENCY",
                    weight_defaults.time_efficiency,
                )?,
            },
        };

        let backend = parse_or(&lookup, "CAPABILITY_BACKEND", CapabilityBackend::Rules)?;
        let anthropic_api_key = lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty());

        if backend == CapabilityBackend::Llm && anthropic_api_key.is_none() {
            bail!("CAPABILITY_BACKEND=llm requires ANTHROPIC_API_KEY to be set");
        }

        Ok(Config {
            interview,
            backend,
            anthropic_api_key,
            llm_timeout_seconds: parse_or(&lookup, "LLM_TIMEOUT_SECONDS", 30)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        _ => Ok(default),
    }
}

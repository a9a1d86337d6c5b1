use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Technical,
    Conceptual,
    Behavioral,
    Scenario,
}

impl QuestionType {
    /// Rotation order covering all four types across an interview.
    pub const ROTATION: [QuestionType; 4] = [
        QuestionType::Technical,
        QuestionType::Conceptual,
        QuestionType::Behavioral,
        QuestionType::Scenario,
    ];

    /// Type for the question at zero-based position `index`.
    pub fn for_index(index: usize) -> Self {
        Self::ROTATION[index % Self::ROTATION.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Technical => "technical",
            QuestionType::Conceptual => "conceptual",
            QuestionType::Behavioral => "behavioral",
            QuestionType::Scenario => "scenario",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn step_up(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Hard => Difficulty::Hard,
        }
    }

    pub fn step_down(self) -> Self {
        match self {
            Difficulty::Hard => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Easy => Difficulty::Easy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An interview question. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub difficulty: Difficulty,
    pub skill_tags: BTreeSet<String>,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        kind: QuestionType,
        difficulty: Difficulty,
        skill_tags: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            kind,
            difficulty,
            skill_tags: skill_tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Normalised text used to detect repeats within a session.
    pub fn dedup_key(&self) -> String {
        normalize_text(&self.text)
    }
}

pub(crate) fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A candidate's answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub elapsed_seconds: f64,
    /// False when time expired with nothing submitted.
    pub submitted: bool,
}

impl Answer {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

//! Question Bank: pluggable, trait-based question generation plus the
//! filter-relaxation policy used by the session.
//!
//! Default: `RuleBasedGenerator` (templates over the profile's focus skills).
//! Alternative: `LlmQuestionGenerator` (Claude via `llm_client`).

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::{CapabilityError, InterviewError};
use crate::models::profile::ProfileContext;
use crate::models::question::{Difficulty, Question, QuestionType};

pub mod llm;
pub mod prompts;
pub mod rule_based;

pub use llm::LlmQuestionGenerator;
pub use rule_based::RuleBasedGenerator;

/// How strictly a request is filtered. Tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTier {
    /// Type, difficulty and skill overlap with the profile.
    Strict,
    /// Type and skill filters relaxed; difficulty still enforced.
    AnyType,
    /// Difficulty relaxed too; any unused question.
    AnyDifficulty,
}

impl FilterTier {
    pub const ORDER: [FilterTier; 3] = [
        FilterTier::Strict,
        FilterTier::AnyType,
        FilterTier::AnyDifficulty,
    ];
}

/// What the session is asking for. `kind` and `difficulty` are always the
/// session's targets; `tier` decides which of them are enforced.
#[derive(Debug, Clone, Copy)]
pub struct QuestionRequest<'a> {
    pub kind: QuestionType,
    pub difficulty: Difficulty,
    pub tier: FilterTier,
    pub profile: &'a ProfileContext,
    /// Questions already issued in this session.
    pub asked: &'a [Question],
}

impl QuestionRequest<'_> {
    pub fn kind_filter(&self) -> Option<QuestionType> {
        match self.tier {
            FilterTier::Strict => Some(self.kind),
            FilterTier::AnyType | FilterTier::AnyDifficulty => None,
        }
    }

    pub fn difficulty_filter(&self) -> Option<Difficulty> {
        match self.tier {
            FilterTier::Strict | FilterTier::AnyType => Some(self.difficulty),
            FilterTier::AnyDifficulty => None,
        }
    }

    pub fn requires_skill_overlap(&self) -> bool {
        self.tier == FilterTier::Strict
    }

    /// True if no earlier question in the session has the same text.
    pub fn is_unused(&self, question: &Question) -> bool {
        let key = question.dedup_key();
        !self.asked.iter().any(|q| q.dedup_key() == key)
    }

    /// True if `question` is unused and satisfies every enforced filter.
    pub fn accepts(&self, question: &Question) -> bool {
        if let Some(kind) = self.kind_filter() {
            if question.kind != kind {
                return false;
            }
        }
        if let Some(difficulty) = self.difficulty_filter() {
            if question.difficulty != difficulty {
                return false;
            }
        }
        if self.requires_skill_overlap() && !self.profile.overlaps(&question.skill_tags) {
            return false;
        }
        self.is_unused(question)
    }
}

/// The question generation capability.
///
/// Returns `Ok(None)` when no unused question satisfies the request.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate_question(
        &self,
        request: &QuestionRequest<'_>,
    ) -> Result<Option<Question>, CapabilityError>;

    /// "rules" | "llm"
    fn backend(&self) -> &'static str;
}

/// Asks `generator` for a question, relaxing the filter tier by tier.
///
/// Output that violates the tier's filters is discarded. Fails with
/// `InterviewError::Exhaustion` when every tier comes back empty.
pub async fn select_question(
    generator: &dyn QuestionGenerator,
    kind: QuestionType,
    difficulty: Difficulty,
    profile: &ProfileContext,
    asked: &[Question],
) -> Result<(Question, FilterTier), InterviewError> {
    for tier in FilterTier::ORDER {
        let request = QuestionRequest {
            kind,
            difficulty,
            tier,
            profile,
            asked,
        };

        match generator.generate_question(&request).await? {
            Some(question) if request.accepts(&question) => {
                if tier != FilterTier::Strict {
                    debug!("Question selected after relaxing filters to {:?}", tier);
                }
                return Ok((question, tier));
            }
            Some(question) => {
                warn!(
                    "Generator '{}' returned a question outside the {:?} filter: {:?}",
                    generator.backend(),
                    tier,
                    question.text.chars().take(60).collect::<String>()
                );
            }
            None => debug!("No {:?} question available for {} / {}", tier, kind, difficulty),
        }
    }

    Err(InterviewError::Exhaustion(format!(
        "no unused question available after {} previous questions (target {kind}, {difficulty})",
        asked.len()
    )))
}

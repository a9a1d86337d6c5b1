use thiserror::Error;

use crate::llm_client::LlmError;

/// Failure of an external generation/evaluation capability.
///
/// Never surfaced to the candidate: the capability layer logs it and falls
/// back to the rule-based implementation for that single call.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Capability returned unusable output: {0}")]
    InvalidOutput(String),

    #[error("Capability unavailable: {0}")]
    Unavailable(String),
}

/// Engine-level error type returned by session and report operations.
#[derive(Debug, Error)]
pub enum InterviewError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Question bank exhausted: {0}")]
    Exhaustion(String),

    #[error("Capability error: {0}")]
    Capability(#[from] CapabilityError),

    #[error("Out-of-sequence call: {0}")]
    Sequence(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl InterviewError {
    /// Stable machine-readable code, mirrored in runner output and logs.
    pub fn code(&self) -> &'static str {
        match self {
            InterviewError::Config(_) => "CONFIG_ERROR",
            InterviewError::Exhaustion(_) => "EXHAUSTION_ERROR",
            InterviewError::Capability(_) => "CAPABILITY_ERROR",
            InterviewError::Sequence(_) => "SEQUENCE_ERROR",
            InterviewError::Validation(_) => "VALIDATION_ERROR",
        }
    }

    /// Whether the session can still be finished and reported after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            InterviewError::Exhaustion(_)
                | InterviewError::Capability(_)
                | InterviewError::Validation(_)
        )
    }
}

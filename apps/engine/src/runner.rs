//! Scripted runner: drives a session from a profile file and a list of
//! pre-recorded answers, then builds the report.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{info, warn};

use crate::capability::Capabilities;
use crate::config::InterviewConfig;
use crate::errors::InterviewError;
use crate::interview::InterviewSession;
use crate::models::profile::ProfileContext;
use crate::report::{self, Report};

/// One pre-recorded answer, consumed in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedAnswer {
    pub text: String,
    pub elapsed_seconds: f64,
}

pub fn load_profile(path: &Path) -> Result<ProfileContext> {
    read_json(path).context("Failed to load candidate profile")
}

pub fn load_answers(path: &Path) -> Result<Vec<ScriptedAnswer>> {
    read_json(path).context("Failed to load scripted answers")
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in '{}'", path.display()))
}

/// Runs one interview over `answers` and returns its report.
///
/// The session is finished when the answers run out or the question bank is
/// exhausted; any other session error aborts the run.
pub async fn run_scripted(
    profile: ProfileContext,
    config: InterviewConfig,
    capabilities: Capabilities,
    answers: &[ScriptedAnswer],
) -> Result<Report> {
    let mut session = InterviewSession::start(profile, config, capabilities)
        .context("Failed to start interview session")?;

    for answer in answers {
        if session.status().is_terminal() {
            break;
        }

        let question_id = match session.next_question().await {
            Ok(question) => question.id,
            Err(InterviewError::Exhaustion(reason)) => {
                warn!("Stopping early: {reason}");
                break;
            }
            Err(e) => return Err(e).context("Failed to fetch the next question"),
        };

        session
            .submit_answer(question_id, &answer.text, answer.elapsed_seconds)
            .await
            .context("Failed to submit scripted answer")?;
    }

    let status = session.finish();
    info!(
        "Scripted run ended with {:?} after {} questions",
        status,
        session.question_count()
    );

    report::build(&session)
        .await
        .context("Failed to build interview report")
}

//! Template-driven question generator. No LLM call; every question is built
//! from a fixed template set filled with the profile's focus skills.
//!
//! Placeholders: `{skill}`, `{skill2}`, `{role}`, `{experience}`.

use async_trait::async_trait;

use crate::errors::CapabilityError;
use crate::models::profile::ProfileContext;
use crate::models::question::{Difficulty, Question, QuestionType};
use crate::question_bank::{QuestionGenerator, QuestionRequest};

/// Skills used when the profile carries none.
const FALLBACK_SKILLS: [&str; 2] = ["Problem Solving", "Communication"];
/// Cap on how many focus skills seed the catalog.
const MAX_FOCUS_SKILLS: usize = 6;

fn templates(kind: QuestionType, difficulty: Difficulty) -> &'static [&'static str] {
    use Difficulty::*;
    use QuestionType::*;

    match (kind, difficulty) {
        (Technical, Easy) => &[
            "What is your hands-on experience with {skill}, and where have you applied it?",
            "Explain the core building blocks of {skill} that matter most for a {role}.",
            "How would you set up {skill} at the start of a new project?",
            "Describe a small feature you delivered using {skill}.",
        ],
        (Technical, Medium) => &[
            "How would you structure a production service that relies on {skill}?",
            "What is your approach to optimizing {skill} as load grows?",
            "What problems have you hit with {skill}, and how did you solve them?",
            "How do you integrate {skill} with {skill2} in practice?",
            "What trade-offs do you weigh when choosing {skill} over an alternative?",
        ],
        (Technical, Hard) => &[
            "Design a system built around {skill}. Which architecture would you choose and why?",
            "How would you handle partial failures in a {skill}-based system at scale?",
            "What are the hard limits of {skill}, and how would you work around them?",
            "Your {skill} workload is degrading under load. How do you diagnose and fix it?",
            "Compare {skill} and {skill2} for a demanding workload. When would you pick each?",
        ],
        (Conceptual, Easy) => &[
            "Why does {skill} matter for a {role}?",
            "How do you keep your knowledge of {skill} and {skill2} current?",
            "In your own words, what problem does {skill} solve?",
        ],
        (Conceptual, Medium) => &[
            "How does {skill} relate to the reliability of the systems a {role} owns?",
            "Which principles guide how you use {skill} day to day?",
            "How would you explain {skill} to a non-technical stakeholder?",
        ],
        (Conceptual, Hard) => &[
            "Where does {skill} stop scaling, and what does that imply for system design?",
            "How would you pay down technical debt in a codebase centred on {skill}?",
            "What would you change about how the industry typically uses {skill}?",
        ],
        (Behavioral, Easy) => &[
            "Tell me about a project where you used {skill}. What was your contribution?",
            "Describe a time you had to learn {skill} quickly.",
            "What did you enjoy most about your work as {experience}?",
        ],
        (Behavioral, Medium) => &[
            "Describe a difficult situation involving {skill}. How did you resolve it?",
            "Tell me about a deadline you met under pressure as {experience}.",
            "How do you prioritise when {skill} and {skill2} work compete for your time?",
        ],
        (Behavioral, Hard) => &[
            "Describe a failure involving {skill} and what you changed afterwards.",
            "Tell me about a decision on {skill} you made with incomplete information.",
            "How have you mentored other engineers on {skill}?",
        ],
        (Scenario, Easy) => &[
            "A teammate asks for help with {skill}. How do you approach it?",
            "A bug shows up in a {skill} component. Walk through your first debugging steps.",
            "You need to onboard a new hire onto {skill}. What is your plan?",
        ],
        (Scenario, Medium) => &[
            "Your {skill} deployment fails at 2 AM. What do you do?",
            "A stakeholder wants to change scope mid-sprint on {skill} work. How do you respond?",
            "A critical {skill} issue reaches production. What is your process?",
        ],
        (Scenario, Hard) => &[
            "Plan a zero-downtime migration from {skill} to {skill2}.",
            "A security vulnerability is reported in your {skill} stack. How do you handle it?",
            "You must choose between speed and quality on a {skill} launch. How do you decide?",
        ],
    }
}

pub struct RuleBasedGenerator;

#[async_trait]
impl QuestionGenerator for RuleBasedGenerator {
    async fn generate_question(
        &self,
        request: &QuestionRequest<'_>,
    ) -> Result<Option<Question>, CapabilityError> {
        Ok(pick_question(request))
    }

    fn backend(&self) -> &'static str {
        "rules"
    }
}

/// Picks a deterministic unused question for `request`, or `None`.
///
/// Candidates are grouped by preference (target type first, then target
/// difficulty, then the nearest difficulty); the first non-empty group wins
/// and the pick within it rotates with the number of questions asked.
pub fn pick_question(request: &QuestionRequest<'_>) -> Option<Question> {
    let focus = focus_skills(request.profile);

    for kind in preferred_kinds(request) {
        for difficulty in preferred_difficulties(request) {
            let group: Vec<Question> = build_candidates(kind, difficulty, request.profile, &focus)
                .into_iter()
                .filter(|q| request.accepts(q))
                .collect();

            if !group.is_empty() {
                let index = request.asked.len() % group.len();
                return group.into_iter().nth(index);
            }
        }
    }
    None
}

fn focus_skills(profile: &ProfileContext) -> Vec<String> {
    let mut focus = profile.focus_skills();
    focus.truncate(MAX_FOCUS_SKILLS);
    if focus.is_empty() {
        focus = FALLBACK_SKILLS.iter().map(|s| s.to_string()).collect();
    }
    focus
}

fn preferred_kinds(request: &QuestionRequest<'_>) -> Vec<QuestionType> {
    match request.kind_filter() {
        Some(kind) => vec![kind],
        None => {
            let start = QuestionType::ROTATION
                .iter()
                .position(|k| *k == request.kind)
                .unwrap_or(0);
            (0..QuestionType::ROTATION.len())
                .map(|offset| QuestionType::for_index(start + offset))
                .collect()
        }
    }
}

fn preferred_difficulties(request: &QuestionRequest<'_>) -> Vec<Difficulty> {
    match request.difficulty_filter() {
        Some(difficulty) => vec![difficulty],
        None => {
            let mut all = Difficulty::ALL.to_vec();
            let target = request.difficulty as i32;
            all.sort_by_key(|d| ((*d as i32) - target).abs());
            all
        }
    }
}

/// Every template for (kind, difficulty) filled with every focus skill.
fn build_candidates(
    kind: QuestionType,
    difficulty: Difficulty,
    profile: &ProfileContext,
    focus: &[String],
) -> Vec<Question> {
    let role = if profile.target_role.trim().is_empty() {
        "software engineer"
    } else {
        profile.target_role.trim()
    };
    let experience = profile
        .latest_experience_title()
        .map(|t| format!("a {t}"))
        .unwrap_or_else(|| "an engineer in your most recent role".to_string());

    let mut candidates = Vec::new();
    for (i, skill) in focus.iter().enumerate() {
        let skill2 = if focus.len() > 1 {
            Some(&focus[(i + 1) % focus.len()])
        } else {
            None
        };

        for template in templates(kind, difficulty) {
            let text = template
                .replace("{skill}", skill)
                .replace(
                    "{skill2}",
                    skill2.map(String::as_str).unwrap_or("related technologies"),
                )
                .replace("{role}", role)
                .replace("{experience}", &experience);

            let mut tags = vec![skill.clone()];
            if template.contains("{skill2}") {
                if let Some(second) = skill2 {
                    tags.push(second.clone());
                }
            }
            candidates.push(Question::new(text, kind, difficulty, tags));
        }
    }
    candidates
}

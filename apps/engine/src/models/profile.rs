use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

/// A single structured experience entry produced by the resume parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceItem {
    pub title: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub skills: BTreeSet<String>,
}

/// Candidate skills and target-role requirements, as produced by the external
/// resume / job-description parsers. Read-only for the lifetime of a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileContext {
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub experience_items: Vec<ExperienceItem>,
    pub target_role: String,
    #[serde(default)]
    pub role_requirements: BTreeSet<String>,
}

impl ProfileContext {
    pub fn new(
        target_role: impl Into<String>,
        skills: impl IntoIterator<Item = impl Into<String>>,
        role_requirements: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            skills: skills.into_iter().map(Into::into).collect(),
            experience_items: Vec::new(),
            target_role: target_role.into(),
            role_requirements: role_requirements.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_experience(mut self, item: ExperienceItem) -> Self {
        self.experience_items.push(item);
        self
    }

    /// Lowercased union of candidate skills and role requirements.
    pub fn relevant_skills(&self) -> HashSet<String> {
        self.skills
            .iter()
            .chain(self.role_requirements.iter())
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// True if any of `tags` matches a candidate skill or role requirement
    /// (case-insensitive).
    pub fn overlaps<'a>(&self, tags: impl IntoIterator<Item = &'a String>) -> bool {
        let relevant = self.relevant_skills();
        tags.into_iter()
            .any(|t| relevant.contains(&t.trim().to_lowercase()))
    }

    /// Ordered skills to build questions around: requirements the candidate
    /// also lists, then remaining requirements, then remaining candidate skills.
    pub fn focus_skills(&self) -> Vec<String> {
        let candidate: HashSet<String> = self.skills.iter().map(|s| s.to_lowercase()).collect();

        let (matched, unmatched): (Vec<&String>, Vec<&String>) = self
            .role_requirements
            .iter()
            .partition(|r| candidate.contains(&r.to_lowercase()));

        let mut seen = HashSet::new();
        matched
            .into_iter()
            .chain(unmatched)
            .chain(self.skills.iter())
            .filter(|s| !s.trim().is_empty())
            .filter(|s| seen.insert(s.trim().to_lowercase()))
            .map(|s| s.trim().to_string())
            .collect()
    }

    /// Most recent experience title, used to personalise behavioral prompts.
    pub fn latest_experience_title(&self) -> Option<&str> {
        self.experience_items
            .first()
            .map(|e| e.title.as_str())
            .filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_skills_orders_matched_requirements_first() {
        let profile = ProfileContext::new(
            "Backend Developer",
            ["Python", "SQL", "Docker"],
            ["Kubernetes", "sql"],
        );
        let focus = profile.focus_skills();
        assert_eq!(focus[0], "sql");
        assert_eq!(focus[1], "Kubernetes");
        // "SQL" from the candidate list is deduplicated case-insensitively
        assert_eq!(focus.iter().filter(|s| s.eq_ignore_ascii_case("sql")).count(), 1);
        assert!(focus.contains(&"Python".to_string()));
    }

    #[test]
    fn test_overlaps_is_case_insensitive() {
        let profile = ProfileContext::new("Data Engineer", ["Spark"], ["Kafka"]);
        assert!(profile.overlaps(&["spark".to_string()]));
        assert!(profile.overlaps(&["KAFKA".to_string()]));
        assert!(!profile.overlaps(&["Rust".to_string()]));
    }

    #[test]
    fn test_empty_profile_has_no_focus() {
        let profile = ProfileContext::default();
        assert!(profile.focus_skills().is_empty());
        assert!(profile.latest_experience_title().is_none());
    }

    #[test]
    fn test_profile_deserializes_with_defaults() {
        let json = r#"{"target_role": "ML Engineer", "skills": ["PyTorch"]}"#;
        let profile: ProfileContext = serde_json::from_str(json).unwrap();
        assert_eq!(profile.target_role, "ML Engineer");
        assert!(profile.role_requirements.is_empty());
        assert!(profile.experience_items.is_empty());
    }
}

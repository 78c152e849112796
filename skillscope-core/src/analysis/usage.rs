//! Per-entry usage classification
//!
//! Classifies each catalog entry across the analyzed sessions:
//! invoked at least once (active), matched but never invoked (dormant),
//! or never even matched (unused).

use crate::analysis::matcher::find_matches;
use crate::config::AnalysisConfig;
use crate::types::{CatalogEntry, CatalogKind, SessionRecord};
use serde::Serialize;

/// Usage classification for one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageClass {
    /// Invoked in at least one session
    Active,
    /// Triggers matched at least one prompt but the entry never ran
    Dormant,
    /// No trigger matched any prompt
    Unused,
}

impl UsageClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageClass::Active => "active",
            UsageClass::Dormant => "dormant",
            UsageClass::Unused => "unused",
        }
    }
}

/// Classify one entry against all sessions. Active wins over dormant.
pub fn classify_entry(
    entry: &CatalogEntry,
    sessions: &[SessionRecord],
    config: &AnalysisConfig,
) -> UsageClass {
    let invoked = sessions.iter().any(|s| match entry.kind {
        CatalogKind::Skill => s.invoked_skills.contains(&entry.name),
        CatalogKind::Agent => s.invoked_agents.contains(&entry.name),
        CatalogKind::Command => {
            let needle = format!("/{}", entry.name.to_lowercase());
            s.prompts.iter().any(|p| p.to_lowercase().contains(&needle))
        }
    });
    if invoked {
        return UsageClass::Active;
    }

    let catalog = std::slice::from_ref(entry);
    let matched = sessions.iter().any(|s| {
        s.prompts
            .iter()
            .any(|p| !find_matches(p, catalog, config.min_triggers, 0.0).is_empty())
    });
    if matched {
        UsageClass::Dormant
    } else {
        UsageClass::Unused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceOrigin;
    use std::path::PathBuf;

    fn skill(name: &str, triggers: &[&str]) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            kind: CatalogKind::Skill,
            description: String::new(),
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
            origin: SourceOrigin::User,
            source_path: PathBuf::from("/test"),
        }
    }

    fn session(prompts: &[&str]) -> SessionRecord {
        SessionRecord {
            session_id: "s".to_string(),
            prompts: prompts.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            min_triggers: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_active_when_invoked() {
        let entry = skill("systematic-debugging", &["debug", "debugging", "error"]);
        let mut s = session(&["Help me debug this error in the code"]);
        s.invoked_skills.insert("systematic-debugging".to_string());
        assert_eq!(classify_entry(&entry, &[s], &config()), UsageClass::Active);
    }

    #[test]
    fn test_active_wins_over_dormant() {
        let entry = skill("systematic-debugging", &["debug", "debugging", "error"]);
        let dormant = session(&["Help me debug this error in the code"]);
        let mut active = session(&["more debugging please"]);
        active.invoked_skills.insert("systematic-debugging".to_string());
        assert_eq!(
            classify_entry(&entry, &[dormant, active], &config()),
            UsageClass::Active
        );
    }

    #[test]
    fn test_dormant_when_matched_not_invoked() {
        let entry = skill("systematic-debugging", &["debug", "debugging", "error"]);
        let s = session(&["Help me debug this error in the code"]);
        assert_eq!(classify_entry(&entry, &[s], &config()), UsageClass::Dormant);
    }

    #[test]
    fn test_unused_when_no_match() {
        let entry = skill("kubernetes-deployment", &["kubernetes", "helm", "kubectl"]);
        let s = session(&["Write a hello world function"]);
        assert_eq!(classify_entry(&entry, &[s], &config()), UsageClass::Unused);
        assert_eq!(classify_entry(&entry, &[], &config()), UsageClass::Unused);
    }
}

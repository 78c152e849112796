//! Core domain types for skillscope
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Catalog entry** | A named capability: a skill, an agent, or a slash command |
//! | **Trigger** | A phrase whose presence in a prompt is evidence the capability applies |
//! | **Session** | One parsed conversation log between a human and the assistant |
//! | **Missed opportunity** | A capability whose triggers matched a prompt but which never ran |
//! | **Collision** | Two or more catalog entries declaring the identical trigger |
//!
//! Catalog entries and session records are built once per analysis run by the
//! `discovery` and `ingest` modules and are immutable afterwards; the analysis
//! layer never touches the filesystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

// ============================================
// Catalog
// ============================================

/// What kind of capability a catalog entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Skill,
    Agent,
    Command,
}

impl CatalogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Skill => "skill",
            CatalogKind::Agent => "agent",
            CatalogKind::Command => "command",
        }
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skill" => Ok(CatalogKind::Skill),
            "agent" => Ok(CatalogKind::Agent),
            "command" => Ok(CatalogKind::Command),
            _ => Err(format!("unknown catalog kind: {}", s)),
        }
    }
}

/// Where a catalog entry was discovered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceOrigin {
    /// User-level configuration (e.g. `~/.claude`)
    User,
    /// Project-level configuration (e.g. `<repo>/.claude`)
    Project,
    /// Installed plugin, identified by plugin name
    Plugin { name: String },
}

impl SourceOrigin {
    /// Plugin name, if this origin is a plugin.
    pub fn plugin_name(&self) -> Option<&str> {
        match self {
            SourceOrigin::Plugin { name } => Some(name),
            _ => None,
        }
    }

    pub fn is_plugin(&self) -> bool {
        matches!(self, SourceOrigin::Plugin { .. })
    }
}

impl std::fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceOrigin::User => f.write_str("user"),
            SourceOrigin::Project => f.write_str("project"),
            SourceOrigin::Plugin { name } => write!(f, "plugin:{}", name),
        }
    }
}

/// One skill, agent, or command available to the assistant.
///
/// `triggers` is never empty after discovery: the lower-cased name is always
/// appended (commands additionally get `/name`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Name, unique within its kind
    pub name: String,
    /// Skill, agent, or command
    pub kind: CatalogKind,
    /// Free-text description from front-matter
    pub description: String,
    /// Trigger phrases, including the entry's own name
    pub triggers: Vec<String>,
    /// Where the entry was discovered
    pub origin: SourceOrigin,
    /// Path of the defining file
    pub source_path: PathBuf,
}

impl CatalogEntry {
    /// Display identifier in `kind:name` form.
    pub fn ident(&self) -> String {
        format!("{}:{}", self.kind, self.name)
    }
}

// ============================================
// Sessions
// ============================================

/// One tool invocation observed in a session log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Tool name (Bash, Edit, Skill, Task, ...)
    pub tool_name: String,
    /// Raw tool input
    pub input: serde_json::Value,
    /// Followup the human typed after interrupting this invocation, if any
    pub followup: Option<String>,
}

/// One parsed conversation session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session identifier (from the log file name)
    pub session_id: String,
    /// Human-authored prompt texts, system-generated text filtered out
    pub prompts: Vec<String>,
    /// Skill names actually invoked
    pub invoked_skills: HashSet<String>,
    /// Agent names actually invoked
    pub invoked_agents: HashSet<String>,
    /// Other tools used at least once
    pub tools_used: HashSet<String>,
    /// Timestamp of the session (first record, or file mtime)
    pub session_date: Option<DateTime<Utc>>,
    /// Project path the session ran in
    pub project_path: Option<String>,
    /// Tool results classified as successes
    pub success_count: usize,
    /// Tool results classified as failures
    pub failure_count: usize,
    /// Times the human interrupted a running tool
    pub interrupted_count: usize,
    /// Context compactions observed
    pub compaction_count: usize,
    /// Tools that were interrupted, with the followup message when captured
    pub interrupted_tools: Vec<ToolInvocation>,
}

// ============================================
// Analysis results
// ============================================

/// Output of the trigger matcher for one (prompt, entry) pair.
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    /// The matched catalog entry
    pub entry: &'a CatalogEntry,
    /// Triggers found in the prompt, in catalog order
    pub matched_triggers: Vec<String>,
    /// Match confidence in [0, 1]
    pub confidence: f64,
}

/// One aggregated missed-opportunity finding for a capability.
#[derive(Debug, Clone, Serialize)]
pub struct MissedOpportunity {
    /// The capability that matched but never ran
    pub entry: CatalogEntry,
    /// Number of contributing matches
    pub occurrence_count: usize,
    /// Distinct sessions the matches came from
    pub sessions_affected: usize,
    /// Up to 3 representative session ids
    pub example_session_ids: Vec<String>,
    /// Best confidence among contributing matches
    pub confidence: f64,
    /// Ranking score in [0, 1]
    pub impact_score: f64,
}

/// How an overlap was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    Exact,
    Stemmed,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::Exact => "exact",
            DetectionMethod::Stemmed => "stemmed",
        }
    }
}

/// Classification of an overlap finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverlapClass {
    /// Two entries compete for the same trigger
    Collision,
    /// Two triggers stem to highly similar token sets
    Semantic,
    /// Same-origin command/skill pairing assumed to be deliberate delegation
    Pattern,
}

impl OverlapClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlapClass::Collision => "COLLISION",
            OverlapClass::Semantic => "SEMANTIC",
            OverlapClass::Pattern => "PATTERN",
        }
    }
}

/// Severity of an overlap finding, ordered most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Info => "INFO",
        }
    }
}

/// One group of catalog entries sharing a trigger, or a near-duplicate pair.
#[derive(Debug, Clone, Serialize)]
pub struct OverlapFinding {
    /// The shared trigger, or a pseudo-label such as
    /// `[name collision: deploy]` or `fix bug ↔ bug fixing`
    pub trigger: String,
    /// `kind:name` identifiers of the involved entries (at least 2)
    pub items: Vec<String>,
    pub classification: OverlapClass,
    pub severity: Severity,
    pub detection_method: DetectionMethod,
    /// Jaccard similarity for stemmed findings, absent for exact ones
    pub similarity: Option<f64>,
    /// True when the overlap looks like deliberate delegation
    pub intentional: bool,
    /// Shared origin for PATTERN findings, when known
    pub shared_origin: Option<SourceOrigin>,
    /// Human-readable remediation hint
    pub hint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_kind_roundtrip() {
        for kind in [CatalogKind::Skill, CatalogKind::Agent, CatalogKind::Command] {
            let parsed: CatalogKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("widget".parse::<CatalogKind>().is_err());
    }

    #[test]
    fn test_source_origin_display() {
        assert_eq!(SourceOrigin::User.to_string(), "user");
        assert_eq!(SourceOrigin::Project.to_string(), "project");
        let plugin = SourceOrigin::Plugin {
            name: "deploy-kit".to_string(),
        };
        assert_eq!(plugin.to_string(), "plugin:deploy-kit");
        assert_eq!(plugin.plugin_name(), Some("deploy-kit"));
        assert!(plugin.is_plugin());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High < Severity::Medium);
        assert!(Severity::Medium < Severity::Low);
        assert!(Severity::Low < Severity::Info);
    }
}

//! Rendering of analysis results for the CLI.
//!
//! Text renderers return a `String` so they can be unit tested without
//! capturing stdout; JSON renderers return a `serde_json::Value` the
//! caller pretty-prints.

use crate::analysis::UsageClass;
use crate::discovery::quality::{CacheIssue, DescriptionFinding};
use crate::types::{CatalogEntry, MissedOpportunity, OverlapFinding, SessionRecord};
use serde_json::json;

/// Aggregate counters across the analyzed sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionSummary {
    pub session_count: usize,
    pub prompt_count: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub interrupted_count: usize,
    pub compaction_count: usize,
}

impl SessionSummary {
    pub fn from_sessions(sessions: &[SessionRecord]) -> Self {
        let mut summary = SessionSummary {
            session_count: sessions.len(),
            ..Default::default()
        };
        for session in sessions {
            summary.prompt_count += session.prompts.len();
            summary.success_count += session.success_count;
            summary.failure_count += session.failure_count;
            summary.interrupted_count += session.interrupted_count;
            summary.compaction_count += session.compaction_count;
        }
        summary
    }

    fn to_json(&self) -> serde_json::Value {
        json!({
            "sessions": self.session_count,
            "prompts": self.prompt_count,
            "tool_successes": self.success_count,
            "tool_failures": self.failure_count,
            "interruptions": self.interrupted_count,
            "compactions": self.compaction_count,
        })
    }
}

/// Format a [0, 1] score as an integer percent.
pub fn format_percent(score: f64) -> String {
    format!("{}%", (score * 100.0).round() as i64)
}

fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}

// ============================================
// Missed opportunities
// ============================================

pub fn render_missed_text(missed: &[MissedOpportunity], summary: &SessionSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Analyzed {} session(s), {} prompt(s)\n",
        summary.session_count, summary.prompt_count
    ));

    if missed.is_empty() {
        out.push_str("\nNo missed opportunities found.\n");
        return out;
    }

    out.push_str(&format!("\n{} missed opportunit(ies):\n\n", missed.len()));
    for (rank, opp) in missed.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} (impact {}, confidence {})\n",
            rank + 1,
            opp.entry.ident(),
            format_percent(opp.impact_score),
            format_percent(opp.confidence),
        ));
        out.push_str(&format!(
            "   {} occurrence(s) across {} session(s)",
            opp.occurrence_count, opp.sessions_affected
        ));
        if !opp.example_session_ids.is_empty() {
            out.push_str(&format!(
                " (e.g. {})",
                opp.example_session_ids.join(", ")
            ));
        }
        out.push('\n');
        if !opp.entry.description.is_empty() {
            out.push_str(&format!(
                "   {}\n",
                truncate_text(&opp.entry.description, 100)
            ));
        }
    }
    out
}

pub fn missed_to_json(missed: &[MissedOpportunity], summary: &SessionSummary) -> serde_json::Value {
    json!({
        "summary": summary.to_json(),
        "missed_opportunities": missed.iter().map(|opp| {
            json!({
                "name": opp.entry.name,
                "kind": opp.entry.kind,
                "origin": opp.entry.origin,
                "occurrence_count": opp.occurrence_count,
                "sessions_affected": opp.sessions_affected,
                "example_session_ids": opp.example_session_ids,
                "confidence": opp.confidence,
                "impact_score": opp.impact_score,
            })
        }).collect::<Vec<_>>(),
    })
}

// ============================================
// Overlaps
// ============================================

pub fn render_overlaps_text(findings: &[OverlapFinding]) -> String {
    let mut out = String::new();

    if findings.is_empty() {
        out.push_str("No overlapping triggers found.\n");
        return out;
    }

    out.push_str(&format!("{} overlap finding(s):\n\n", findings.len()));
    for finding in findings {
        out.push_str(&format!(
            "[{}] {} {}\n",
            finding.severity.as_str(),
            finding.classification.as_str(),
            finding.trigger
        ));
        out.push_str(&format!("   items: {}\n", finding.items.join(", ")));
        if let Some(similarity) = finding.similarity {
            out.push_str(&format!("   similarity: {}\n", format_percent(similarity)));
        }
        if !finding.hint.is_empty() {
            out.push_str(&format!("   {}\n", finding.hint));
        }
        out.push('\n');
    }
    out
}

pub fn overlaps_to_json(findings: &[OverlapFinding]) -> serde_json::Value {
    json!({
        "finding_count": findings.len(),
        "findings": findings,
    })
}

// ============================================
// Catalog
// ============================================

/// Render the catalog listing. `usage` is aligned with `entries` by
/// index and present when the caller classified entries against a
/// project's sessions.
pub fn render_catalog_text(entries: &[CatalogEntry], usage: Option<&[UsageClass]>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} catalog entr(ies):\n\n", entries.len()));
    for (idx, entry) in entries.iter().enumerate() {
        let usage_suffix = usage
            .and_then(|u| u.get(idx))
            .map(|class| format!(" ({})", class.as_str()))
            .unwrap_or_default();
        out.push_str(&format!(
            "{} [{}]{}\n",
            entry.ident(),
            entry.origin,
            usage_suffix
        ));
        if !entry.description.is_empty() {
            out.push_str(&format!("   {}\n", truncate_text(&entry.description, 100)));
        }
        out.push_str(&format!("   triggers: {}\n", entry.triggers.join(", ")));
    }
    out
}

pub fn catalog_to_json(entries: &[CatalogEntry], usage: Option<&[UsageClass]>) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let mut value = serde_json::to_value(entry).unwrap_or_default();
            if let (Some(classes), Some(map)) = (usage, value.as_object_mut()) {
                if let Some(class) = classes.get(idx) {
                    map.insert("usage".to_string(), json!(class));
                }
            }
            value
        })
        .collect();
    json!({
        "entry_count": entries.len(),
        "entries": entries,
    })
}

// ============================================
// Doctor (configuration quality)
// ============================================

pub fn render_doctor_text(cache: &[CacheIssue], descriptions: &[DescriptionFinding]) -> String {
    let mut out = String::new();
    if cache.is_empty() && descriptions.is_empty() {
        out.push_str("No configuration issues found.\n");
        return out;
    }

    out.push_str(&format!(
        "{} configuration issue(s):\n\n",
        cache.len() + descriptions.len()
    ));
    for issue in cache {
        match issue {
            CacheIssue::TempLeftover { path } => {
                out.push_str(&format!("leftover temp directory in plugin cache: {}\n", path));
            }
            CacheIssue::OldVersions {
                marketplace,
                plugin,
                active_version,
                old_versions,
                old_count,
            } => {
                out.push_str(&format!(
                    "{}/{} keeps {} old version(s) ({}) alongside {}\n",
                    marketplace,
                    plugin,
                    old_count,
                    old_versions.join(", "),
                    active_version
                ));
            }
            CacheIssue::OrphanedMarketplace { name } => {
                out.push_str(&format!("cached marketplace not in settings: {}\n", name));
            }
        }
    }
    for finding in descriptions {
        out.push_str(&format!("{}: {}\n", finding.item, finding.issue.as_str()));
    }
    out
}

pub fn doctor_to_json(cache: &[CacheIssue], descriptions: &[DescriptionFinding]) -> serde_json::Value {
    json!({
        "issue_count": cache.len() + descriptions.len(),
        "cache_issues": cache,
        "description_issues": descriptions,
    })
}

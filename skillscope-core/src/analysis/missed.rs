//! Missed-opportunity detection
//!
//! Runs the trigger matcher across every prompt of every session, drops
//! matches where the capability actually ran, aggregates the rest per
//! catalog entry, and ranks the findings by impact.

use crate::analysis::impact::{frequency_score, impact_score, recency_score};
use crate::analysis::matcher::find_matches;
use crate::config::AnalysisConfig;
use crate::types::{CatalogEntry, CatalogKind, MissedOpportunity, SessionRecord};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

struct Accumulator {
    occurrence_count: usize,
    session_ids: Vec<String>,
    best_confidence: f64,
    most_recent: Option<DateTime<Utc>>,
}

/// Whether the capability actually ran in the session containing `prompt`.
///
/// Skills and agents are checked against the session's invoked sets;
/// commands are considered used when the literal `/name` appears in the
/// prompt text.
fn was_used(entry: &CatalogEntry, session: &SessionRecord, prompt_lower: &str) -> bool {
    match entry.kind {
        CatalogKind::Skill => session.invoked_skills.contains(&entry.name),
        CatalogKind::Agent => session.invoked_agents.contains(&entry.name),
        CatalogKind::Command => {
            prompt_lower.contains(&format!("/{}", entry.name.to_lowercase()))
        }
    }
}

/// Detect missed opportunities using the current wall clock for recency.
pub fn detect_missed_opportunities(
    sessions: &[SessionRecord],
    catalog: &[CatalogEntry],
    config: &AnalysisConfig,
) -> Vec<MissedOpportunity> {
    detect_missed_opportunities_at(sessions, catalog, config, Utc::now())
}

/// Detect missed opportunities relative to a fixed reference time.
///
/// Deterministic for identical inputs: grouping preserves catalog order
/// and the final sort breaks impact ties on occurrence count, then name.
pub fn detect_missed_opportunities_at(
    sessions: &[SessionRecord],
    catalog: &[CatalogEntry],
    config: &AnalysisConfig,
    now: DateTime<Utc>,
) -> Vec<MissedOpportunity> {
    if sessions.is_empty() || catalog.is_empty() {
        return Vec::new();
    }

    // Keyed by catalog index so identical names across kinds stay separate
    let mut groups: HashMap<usize, Accumulator> = HashMap::new();
    let index_of: HashMap<(CatalogKind, &str), usize> = catalog
        .iter()
        .enumerate()
        .map(|(i, e)| ((e.kind, e.name.as_str()), i))
        .collect();

    for session in sessions {
        for prompt in &session.prompts {
            let prompt_lower = prompt.to_lowercase();
            let matches = find_matches(prompt, catalog, config.min_triggers, config.min_confidence);

            for m in matches {
                if was_used(m.entry, session, &prompt_lower) {
                    continue;
                }

                let idx = index_of[&(m.entry.kind, m.entry.name.as_str())];
                let acc = groups.entry(idx).or_insert_with(|| Accumulator {
                    occurrence_count: 0,
                    session_ids: Vec::new(),
                    best_confidence: 0.0,
                    most_recent: None,
                });
                acc.occurrence_count += 1;
                if !acc.session_ids.contains(&session.session_id) {
                    acc.session_ids.push(session.session_id.clone());
                }
                acc.best_confidence = acc.best_confidence.max(m.confidence);
                if let Some(date) = session.session_date {
                    acc.most_recent = Some(match acc.most_recent {
                        Some(existing) => existing.max(date),
                        None => date,
                    });
                }
            }
        }
    }

    let period_days = config.analysis_period_days as f64;
    let mut findings: Vec<MissedOpportunity> = groups
        .into_iter()
        .map(|(idx, acc)| {
            let recency = match acc.most_recent {
                Some(date) => {
                    let age_days = (now - date).num_seconds() as f64 / 86_400.0;
                    recency_score(age_days.max(0.0), period_days)
                }
                None => 0.0,
            };
            let frequency = frequency_score(acc.occurrence_count);
            let impact = impact_score(acc.best_confidence, frequency, recency);

            MissedOpportunity {
                entry: catalog[idx].clone(),
                occurrence_count: acc.occurrence_count,
                sessions_affected: acc.session_ids.len(),
                example_session_ids: acc.session_ids.iter().take(3).cloned().collect(),
                confidence: acc.best_confidence,
                impact_score: impact,
            }
        })
        .collect();

    findings.sort_by(|a, b| {
        b.impact_score
            .total_cmp(&a.impact_score)
            .then_with(|| b.occurrence_count.cmp(&a.occurrence_count))
            .then_with(|| a.entry.name.cmp(&b.entry.name))
    });

    findings
}

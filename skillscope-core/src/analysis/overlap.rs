//! Overlap and collision detection across the capability catalog
//!
//! Two passes: exact trigger collisions (including skill/command name
//! collisions), then near-duplicate triggers via Jaccard similarity over
//! stemmed token sets. Every finding carries a remediation hint.

use crate::analysis::matcher::trigger_eligible;
use crate::analysis::stem::{jaccard_similarity, tokenize_and_stem};
use crate::config::AnalysisConfig;
use crate::types::{
    CatalogEntry, CatalogKind, DetectionMethod, OverlapClass, OverlapFinding, Severity,
    SourceOrigin,
};
use std::collections::{BTreeMap, BTreeSet};

/// Compute overlap findings for the full catalog.
///
/// Results are ranked with name-collision and HIGH-severity findings
/// first and capped at `config.max_findings`.
pub fn compute_overlaps(catalog: &[CatalogEntry], config: &AnalysisConfig) -> Vec<OverlapFinding> {
    let mut findings = Vec::new();
    // Entry pairs pass 1 classified as intentional delegation; pass 2
    // must not re-report them as near-duplicates.
    let mut pattern_pairs: BTreeSet<(usize, usize)> = BTreeSet::new();

    // Pass 1: exact collisions on lower-cased trigger text
    let mut by_trigger: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, entry) in catalog.iter().enumerate() {
        for trigger in &entry.triggers {
            if !trigger_eligible(trigger) {
                continue;
            }
            let key = trigger.to_lowercase();
            let claimants = by_trigger.entry(key).or_default();
            if !claimants.contains(&idx) {
                claimants.push(idx);
            }
        }
    }

    for (trigger, claimants) in &by_trigger {
        if claimants.len() < 2 {
            continue;
        }
        let finding = build_exact_finding(catalog, trigger.clone(), claimants);
        if finding.classification == OverlapClass::Pattern {
            record_pairs(&mut pattern_pairs, claimants);
        }
        findings.push(finding);
    }

    // Name collisions between the skill and command namespaces
    for (skill_idx, skill) in catalog.iter().enumerate() {
        if skill.kind != CatalogKind::Skill {
            continue;
        }
        let name_lower = skill.name.to_lowercase();
        let commands: Vec<usize> = catalog
            .iter()
            .enumerate()
            .filter(|(_, e)| e.kind == CatalogKind::Command && e.name.to_lowercase() == name_lower)
            .map(|(i, _)| i)
            .collect();
        if commands.is_empty() {
            continue;
        }
        let mut claimants = vec![skill_idx];
        claimants.extend(commands);
        let finding = build_exact_finding(
            catalog,
            format!("[name collision: {}]", name_lower),
            &claimants,
        );
        if finding.classification == OverlapClass::Pattern {
            record_pairs(&mut pattern_pairs, &claimants);
        }
        findings.push(finding);
    }

    // Pass 2: semantic near-duplicates over stemmed token sets
    if config.semantic_enabled {
        findings.extend(semantic_findings(
            catalog,
            config.semantic_threshold,
            &pattern_pairs,
        ));
    }

    findings.sort_by(|a, b| {
        let a_name_collision = a.trigger.starts_with("[name collision:");
        let b_name_collision = b.trigger.starts_with("[name collision:");
        a.severity
            .cmp(&b.severity)
            .then_with(|| b_name_collision.cmp(&a_name_collision))
            .then_with(|| a.trigger.cmp(&b.trigger))
    });
    findings.truncate(config.max_findings);
    findings
}

fn build_exact_finding(
    catalog: &[CatalogEntry],
    trigger: String,
    claimants: &[usize],
) -> OverlapFinding {
    let entries: Vec<&CatalogEntry> = claimants.iter().map(|&i| &catalog[i]).collect();
    let (classification, severity, intentional, shared_origin) = classify_exact(&entries);

    let mut finding = OverlapFinding {
        trigger,
        items: entries.iter().map(|e| e.ident()).collect(),
        classification,
        severity,
        detection_method: DetectionMethod::Exact,
        similarity: None,
        intentional,
        shared_origin,
        hint: String::new(),
    };
    finding.hint = generate_hint(&finding);
    finding
}

/// Classify an exact-match overlap from the kinds and origins involved.
fn classify_exact(
    entries: &[&CatalogEntry],
) -> (OverlapClass, Severity, bool, Option<SourceOrigin>) {
    let mut kinds: Vec<CatalogKind> = entries.iter().map(|e| e.kind).collect();
    kinds.sort_by_key(|k| k.as_str());
    kinds.dedup();

    let distinct_origins = {
        let mut seen: Vec<&SourceOrigin> = Vec::new();
        for origin in entries.iter().map(|e| &e.origin) {
            if !seen.contains(&origin) {
                seen.push(origin);
            }
        }
        seen
    };

    let has_command = kinds.contains(&CatalogKind::Command);
    let delegation_kinds = kinds.len() == 2
        && has_command
        && (kinds.contains(&CatalogKind::Skill) || kinds.contains(&CatalogKind::Agent));

    if delegation_kinds && distinct_origins.len() == 1 {
        return (
            OverlapClass::Pattern,
            Severity::Info,
            true,
            Some(distinct_origins[0].clone()),
        );
    }

    if has_command && kinds.len() >= 2 {
        return (OverlapClass::Collision, Severity::High, false, None);
    }

    if distinct_origins.len() >= 2 && distinct_origins.iter().any(|o| o.is_plugin()) {
        return (OverlapClass::Collision, Severity::Medium, false, None);
    }

    (OverlapClass::Collision, Severity::Low, false, None)
}

fn record_pairs(pairs: &mut BTreeSet<(usize, usize)>, claimants: &[usize]) {
    for (i, &a) in claimants.iter().enumerate() {
        for &b in &claimants[i + 1..] {
            pairs.insert((a.min(b), a.max(b)));
        }
    }
}

fn semantic_findings(
    catalog: &[CatalogEntry],
    threshold: f64,
    pattern_pairs: &BTreeSet<(usize, usize)>,
) -> Vec<OverlapFinding> {
    struct StemmedTrigger<'a> {
        entry_idx: usize,
        text: &'a str,
        lower: String,
        stems: std::collections::BTreeSet<String>,
    }

    let mut stemmed: Vec<StemmedTrigger> = Vec::new();
    for (entry_idx, entry) in catalog.iter().enumerate() {
        for trigger in &entry.triggers {
            let stems = tokenize_and_stem(trigger);
            if stems.is_empty() {
                continue;
            }
            stemmed.push(StemmedTrigger {
                entry_idx,
                text: trigger,
                lower: trigger.to_lowercase(),
                stems,
            });
        }
    }

    let mut findings = Vec::new();
    for i in 0..stemmed.len() {
        for j in (i + 1)..stemmed.len() {
            let (a, b) = (&stemmed[i], &stemmed[j]);
            if a.entry_idx == b.entry_idx {
                continue;
            }
            let pair = (
                a.entry_idx.min(b.entry_idx),
                a.entry_idx.max(b.entry_idx),
            );
            if pattern_pairs.contains(&pair) {
                continue;
            }
            // Identical trigger text is pass-1 territory
            if a.lower == b.lower {
                continue;
            }
            let similarity = jaccard_similarity(&a.stems, &b.stems);
            if similarity < threshold {
                continue;
            }
            let severity = if similarity >= 0.8 {
                Severity::Medium
            } else {
                Severity::Low
            };
            let mut finding = OverlapFinding {
                trigger: format!("{} ↔ {}", a.text, b.text),
                items: vec![
                    catalog[a.entry_idx].ident(),
                    catalog[b.entry_idx].ident(),
                ],
                classification: OverlapClass::Semantic,
                severity,
                detection_method: DetectionMethod::Stemmed,
                similarity: Some(similarity),
                intentional: false,
                shared_origin: None,
                hint: String::new(),
            };
            finding.hint = generate_hint(&finding);
            findings.push(finding);
        }
    }
    findings
}

fn item_kind(item: &str) -> Option<&str> {
    item.split_once(':').map(|(kind, _)| kind)
}

fn item_name(item: &str) -> &str {
    item.split_once(':').map(|(_, name)| name).unwrap_or(item)
}

/// Produce a remediation hint for a finding. Pure function of the
/// finding's fields; an under-populated items list yields an empty hint.
pub fn generate_hint(finding: &OverlapFinding) -> String {
    if finding.items.len() < 2 {
        return String::new();
    }
    let a = &finding.items[0];
    let b = &finding.items[1];

    match finding.classification {
        OverlapClass::Pattern => {
            // Point the arrow from the command to the capability it wraps
            let (from, to) = if item_kind(a) == Some("command") {
                (a, b)
            } else {
                (b, a)
            };
            let origin_suffix = match &finding.shared_origin {
                Some(SourceOrigin::Plugin { name }) => format!(" ({})", name),
                Some(origin) => format!(" ({})", origin),
                None => String::new(),
            };
            format!(
                "Assumed delegation: `{}` wraps `{}` (v1 heuristic), no action needed{}",
                from, to, origin_suffix
            )
        }
        OverlapClass::Semantic => {
            let pct = (finding.similarity.unwrap_or(0.0) * 100.0).round() as i64;
            match finding.severity {
                Severity::Medium | Severity::High => format!(
                    "`{}` and `{}` have {}% similar triggers ({}): add distinct trigger prefixes or consolidate them",
                    a, b, pct, finding.trigger
                ),
                _ => format!(
                    "`{}` and `{}` have {}% similar triggers ({}): no action needed unless users report misfires",
                    a, b, pct, finding.trigger
                ),
            }
        }
        OverlapClass::Collision => {
            let kinds: Vec<&str> = finding.items.iter().filter_map(|i| item_kind(i)).collect();
            let has = |k: &str| kinds.iter().any(|x| *x == k);

            if has("agent") {
                let agent = finding
                    .items
                    .iter()
                    .find(|i| item_kind(i) == Some("agent"))
                    .map(|i| item_name(i))
                    .unwrap_or_default();
                let other = finding
                    .items
                    .iter()
                    .find(|i| item_kind(i) != Some("agent"))
                    .cloned()
                    .unwrap_or_default();
                format!(
                    "Agent `{}` and `{}` share trigger `{}`: this creates routing ambiguity, rename or narrow one of the triggers",
                    agent, other, finding.trigger
                )
            } else if has("command") && has("skill") {
                let cmd = finding
                    .items
                    .iter()
                    .find(|i| item_kind(i) == Some("command"))
                    .map(|i| item_name(i))
                    .unwrap_or_default();
                let skill = finding
                    .items
                    .iter()
                    .find(|i| item_kind(i) == Some("skill"))
                    .map(|i| item_name(i))
                    .unwrap_or_default();
                format!(
                    "`{}` (command) and `{}` (skill) overlap on `{}`: if the command delegates to the skill this is an intentional delegation pattern, otherwise rename one",
                    cmd, skill, finding.trigger
                )
            } else if kinds.iter().all(|k| *k == "command") {
                format!(
                    "`{}` and `{}` declare the same trigger `{}` but only one can be invoked: remove or rename one",
                    a, b, finding.trigger
                )
            } else {
                format!(
                    "`{}` and `{}` both trigger on `{}`: rename the less specific one or merge into a single skill",
                    a, b, finding.trigger
                )
            }
        }
    }
}

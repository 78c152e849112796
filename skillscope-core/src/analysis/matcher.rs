//! Trigger matching and confidence scoring
//!
//! Decides which catalog entries plausibly apply to a free-text prompt.
//! Triggers are matched as literals on word boundaries; each match gets a
//! three-factor confidence score (length, specificity, position) and an
//! entry qualifies when enough distinct triggers matched or its own name
//! did, and the confidence clears the caller's threshold.

use crate::analysis::stem::is_blocklisted;
use crate::types::{CatalogEntry, MatchResult};
use regex::Regex;

/// Length score: longer triggers are more specific. Capped at 1.0.
pub fn length_score(trigger: &str) -> f64 {
    let len = trigger.chars().count() as f64;
    (len * 10.0).min(100.0) / 100.0
}

/// Specificity score: multi-word triggers (space or hyphen) are less ambiguous.
pub fn specificity_score(trigger: &str) -> f64 {
    if trigger.contains(' ') || trigger.contains('-') {
        1.0
    } else {
        0.5
    }
}

/// Position score: 1.0 within the first 20 characters, linear decay to 0.0
/// at offset 200, clamped beyond.
pub fn position_score(char_offset: usize) -> f64 {
    if char_offset <= 20 {
        1.0
    } else if char_offset >= 200 {
        0.0
    } else {
        1.0 - (char_offset as f64 - 20.0) / 180.0
    }
}

/// Confidence of one trigger matched at the given character offset.
pub fn confidence(trigger: &str, char_offset: usize) -> f64 {
    (length_score(trigger) + specificity_score(trigger) + position_score(char_offset)) / 3.0
}

/// Whether a trigger is eligible for matching at all.
///
/// Triggers under 3 characters never match. Exactly 3 characters only
/// match when the original text is fully upper-case (acronyms like "TDD")
/// and not a blocklisted word. Blocklisted 4-character words are skipped.
pub fn trigger_eligible(trigger: &str) -> bool {
    let len = trigger.chars().count();
    let lower = trigger.to_lowercase();

    match len {
        0..=2 => false,
        3 => {
            let has_letters = trigger.chars().any(|c| c.is_alphabetic());
            let all_upper = has_letters && !trigger.chars().any(|c| c.is_lowercase());
            all_upper && !is_blocklisted(&lower)
        }
        4 if is_blocklisted(&lower) => false,
        _ => true,
    }
}

/// Find the character offset of the first word-boundary occurrence of
/// `trigger` in `prompt_lower`. The trigger is matched as a literal;
/// regex metacharacters in trigger text never act as patterns.
fn first_match_offset(prompt_lower: &str, trigger_lower: &str) -> Option<usize> {
    let pattern = format!(r"\b{}\b", regex::escape(trigger_lower));
    let re = Regex::new(&pattern).ok()?;
    let m = re.find(prompt_lower)?;
    Some(prompt_lower[..m.start()].chars().count())
}

/// Match every catalog entry's triggers against a prompt.
///
/// An entry qualifies when at least `min_triggers` distinct triggers
/// matched, or the entry's own name matched, and its confidence is
/// strictly above `min_confidence`. Pass `min_confidence = 0.0` to see
/// all candidate matches.
///
/// The entry's confidence is the maximum over its matched triggers, each
/// scored at that trigger's own first occurrence in the prompt.
pub fn find_matches<'a>(
    prompt: &str,
    catalog: &'a [CatalogEntry],
    min_triggers: usize,
    min_confidence: f64,
) -> Vec<MatchResult<'a>> {
    if prompt.trim().is_empty() {
        return Vec::new();
    }

    let prompt_lower = prompt.to_lowercase();
    let mut results = Vec::new();

    for entry in catalog {
        let mut matched_triggers = Vec::new();
        let mut best_confidence: f64 = 0.0;

        for trigger in &entry.triggers {
            if !trigger_eligible(trigger) {
                continue;
            }
            let trigger_lower = trigger.to_lowercase();
            if let Some(offset) = first_match_offset(&prompt_lower, &trigger_lower) {
                // Each trigger already seen in another casing counts once
                if !matched_triggers
                    .iter()
                    .any(|t: &String| t.to_lowercase() == trigger_lower)
                {
                    matched_triggers.push(trigger.clone());
                }
                best_confidence = best_confidence.max(confidence(trigger, offset));
            }
        }

        if matched_triggers.is_empty() {
            continue;
        }

        let name_lower = entry.name.to_lowercase();
        let name_matched = matched_triggers
            .iter()
            .any(|t| t.to_lowercase() == name_lower);

        if (matched_triggers.len() >= min_triggers || name_matched)
            && best_confidence > min_confidence
        {
            results.push(MatchResult {
                entry,
                matched_triggers,
                confidence: best_confidence,
            });
        }
    }

    results
}

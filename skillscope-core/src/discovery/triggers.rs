//! Best-effort trigger extraction from capability descriptions
//!
//! Descriptions are free text; this pulls out phrases that look like
//! declared triggers ("Triggers on 'deploy'", "Use this skill when
//! reviewing code", quoted phrases). Lossy by design.

use regex::Regex;
use std::sync::OnceLock;

fn trigger_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r#"[Tt]riggers?\s+on\s+["']([^"']+)["']"#,
            r"[Tt]riggers?\s+on\s+([^,.]+(?:,\s*[^,.]+)*)",
            r"[Uu]se\s+(?:this\s+)?(?:skill|agent)\s+when\s+([^.]+)",
            r"[Uu]se\s+for\s+([^.]+)",
        ]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
    })
}

fn quoted_phrase_pattern() -> Option<&'static Regex> {
    static QUOTED: OnceLock<Option<Regex>> = OnceLock::new();
    QUOTED
        .get_or_init(|| Regex::new(r#"["']([^"']+)["']"#).ok())
        .as_ref()
}

fn list_separator() -> Option<&'static Regex> {
    static SEP: OnceLock<Option<Regex>> = OnceLock::new();
    SEP.get_or_init(|| Regex::new(r",\s*|\s+or\s+").ok()).as_ref()
}

/// Extract trigger phrases from a description string.
///
/// Matched phrase lists are split on commas and " or ". The result is
/// deduplicated in first-seen order; the caller appends the entry name.
pub fn extract_triggers(description: &str) -> Vec<String> {
    let mut triggers: Vec<String> = Vec::new();
    let mut push = |candidate: &str| {
        let cleaned = candidate
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .to_string();
        if !cleaned.is_empty() && !triggers.contains(&cleaned) {
            triggers.push(cleaned);
        }
    };

    for pattern in trigger_patterns() {
        for caps in pattern.captures_iter(description) {
            if let Some(m) = caps.get(1) {
                match list_separator() {
                    Some(sep) => {
                        for part in sep.split(m.as_str()) {
                            push(part);
                        }
                    }
                    None => push(m.as_str()),
                }
            }
        }
    }

    if let Some(quoted) = quoted_phrase_pattern() {
        for caps in quoted.captures_iter(description) {
            if let Some(m) = caps.get(1) {
                push(m.as_str());
            }
        }
    }

    triggers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triggers_on_quoted() {
        let triggers = extract_triggers("Triggers on 'deploy the app'.");
        assert!(triggers.contains(&"deploy the app".to_string()));
    }

    #[test]
    fn test_use_when_clause() {
        let triggers = extract_triggers("Use this skill when reviewing code. Other text.");
        assert!(triggers.contains(&"reviewing code".to_string()));
    }

    #[test]
    fn test_use_for_clause() {
        let triggers = extract_triggers("Use for systematic debugging.");
        assert!(triggers.contains(&"systematic debugging".to_string()));
    }

    #[test]
    fn test_comma_and_or_splitting() {
        let triggers = extract_triggers("Use for linting, formatting or style checks.");
        assert!(triggers.contains(&"linting".to_string()));
        assert!(triggers.contains(&"formatting".to_string()));
        assert!(triggers.contains(&"style checks".to_string()));
    }

    #[test]
    fn test_quoted_phrases_collected() {
        let triggers = extract_triggers(r#"Handles "secret scanning" and "credential audits"."#);
        assert!(triggers.contains(&"secret scanning".to_string()));
        assert!(triggers.contains(&"credential audits".to_string()));
    }

    #[test]
    fn test_deduplicates() {
        let triggers = extract_triggers("Triggers on 'deploy'. Also handles 'deploy'.");
        assert_eq!(
            triggers.iter().filter(|t| t.as_str() == "deploy").count(),
            1
        );
    }

    #[test]
    fn test_empty_description() {
        assert!(extract_triggers("").is_empty());
        assert!(extract_triggers("A plain sentence with no cues").is_empty());
    }
}

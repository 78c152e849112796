//! Tokenization and stemming for trigger comparison
//!
//! Trigger phrases are normalized into sets of word stems so that
//! morphological variants ("debug"/"debugging") and re-orderings
//! ("code review"/"review code") compare as equal.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::BTreeSet;

/// Articles, prepositions, and conjunctions that carry no trigger signal.
pub const COMMON_WORD_BLOCKLIST: &[&str] = &[
    "the", "a", "an", "is", "are", "to", "for", "of", "in", "on", "at", "by", "with", "and", "or",
    "this", "that", "when", "from", "as", "it",
];

/// Whether a lower-cased word is in the common-word blocklist.
pub fn is_blocklisted(word: &str) -> bool {
    COMMON_WORD_BLOCKLIST.contains(&word)
}

/// Normalize a phrase into a set of word stems.
///
/// Lower-cases, treats `-`/`_` as spaces, strips punctuation from each
/// token, drops blocklisted words, and stems the rest. Idempotent and
/// order-insensitive; a phrase of only blocklisted words yields the
/// empty set.
pub fn tokenize_and_stem(phrase: &str) -> BTreeSet<String> {
    let stemmer = Stemmer::create(Algorithm::English);

    phrase
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| !token.is_empty() && !is_blocklisted(token))
        .map(|token| stemmer.stem(token).into_owned())
        .collect()
}

/// Jaccard similarity of two stem sets; 0.0 when either set is empty.
pub fn jaccard_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_phrase() {
        let result = tokenize_and_stem("code review");
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_hyphen_and_underscore_split() {
        assert_eq!(tokenize_and_stem("code_review").len(), 2);
        assert!(!tokenize_and_stem("test-driven").is_empty());
    }

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(tokenize_and_stem("code! review?"), tokenize_and_stem("code review"));
    }

    #[test]
    fn test_removes_blocklisted_words() {
        let result = tokenize_and_stem("the code for review");
        assert_eq!(result, tokenize_and_stem("code review"));
    }

    #[test]
    fn test_only_blocklisted_words_yields_empty() {
        assert!(tokenize_and_stem("the for and").is_empty());
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(tokenize_and_stem("").is_empty());
        assert!(tokenize_and_stem("   ").is_empty());
    }

    #[test]
    fn test_morphological_collapse() {
        assert_eq!(tokenize_and_stem("debug"), tokenize_and_stem("debugging"));
    }

    #[test]
    fn test_order_insensitive() {
        assert_eq!(
            tokenize_and_stem("code review"),
            tokenize_and_stem("review code")
        );
    }

    #[test]
    fn test_idempotent() {
        let once = tokenize_and_stem("systematic debugging");
        let joined = once.iter().cloned().collect::<Vec<_>>().join(" ");
        assert_eq!(tokenize_and_stem(&joined), once);
    }

    #[test]
    fn test_non_ascii_input() {
        let result = tokenize_and_stem("código revisión");
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_jaccard_identical() {
        let s = tokenize_and_stem("code review");
        assert_eq!(jaccard_similarity(&s, &s), 1.0);
    }

    #[test]
    fn test_jaccard_disjoint() {
        let a = tokenize_and_stem("deploy");
        let b = tokenize_and_stem("review");
        assert_eq!(jaccard_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_jaccard_empty_set() {
        let empty = BTreeSet::new();
        let other = tokenize_and_stem("debug");
        assert_eq!(jaccard_similarity(&empty, &other), 0.0);
    }

    #[test]
    fn test_jaccard_partial_overlap() {
        let a: BTreeSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let b: BTreeSet<String> = ["b", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert!((jaccard_similarity(&a, &b) - 0.5).abs() < 1e-9);
    }
}

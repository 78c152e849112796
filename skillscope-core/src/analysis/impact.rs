//! Impact scoring for missed-opportunity ranking
//!
//! Three pure functions, each returning a value in [0, 1]. Confidence and
//! frequency carry most of the weight; recency breaks ties.

/// Linear ramp on occurrence count, saturating at 20 occurrences.
pub fn frequency_score(occurrence_count: usize) -> f64 {
    occurrence_count.min(20) as f64 / 20.0
}

/// 1.0 for an occurrence today, 0.0 at `period_days` old or older.
pub fn recency_score(age_in_days: f64, period_days: f64) -> f64 {
    if period_days <= 0.0 {
        return 0.0;
    }
    (1.0 - age_in_days / period_days).clamp(0.0, 1.0)
}

/// Weighted combination: confidence 40%, frequency 40%, recency 20%.
pub fn impact_score(confidence: f64, frequency: f64, recency: f64) -> f64 {
    confidence * 0.4 + frequency * 0.4 + recency * 0.2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_ramp() {
        assert!((frequency_score(1) - 0.05).abs() < 1e-9);
        assert!((frequency_score(10) - 0.5).abs() < 1e-9);
        assert_eq!(frequency_score(20), 1.0);
        assert_eq!(frequency_score(100), 1.0);
        assert_eq!(frequency_score(0), 0.0);
    }

    #[test]
    fn test_recency_decay() {
        assert_eq!(recency_score(0.0, 7.0), 1.0);
        assert!((recency_score(3.5, 7.0) - 0.5).abs() < 1e-9);
        assert_eq!(recency_score(7.0, 7.0), 0.0);
        assert_eq!(recency_score(30.0, 7.0), 0.0);
    }

    #[test]
    fn test_recency_never_negative() {
        assert!(recency_score(1000.0, 7.0) >= 0.0);
        assert_eq!(recency_score(1.0, 0.0), 0.0);
    }

    #[test]
    fn test_impact_weights() {
        assert_eq!(impact_score(1.0, 1.0, 1.0), 1.0);
        assert!((impact_score(1.0, 0.0, 0.0) - 0.4).abs() < 1e-9);
        assert!((impact_score(0.0, 1.0, 0.0) - 0.4).abs() < 1e-9);
        assert!((impact_score(0.0, 0.0, 1.0) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_impact_monotonic_in_frequency() {
        let mut last = 0.0;
        for count in 0..30 {
            let score = impact_score(0.85, frequency_score(count), 0.5);
            assert!(score >= last);
            last = score;
        }
    }

    #[test]
    fn test_rare_recent_ranks_below_frequent_old() {
        // A single very confident, very recent match must not outrank a
        // capability missed many times with no recency at all.
        let rare_recent = impact_score(1.0, frequency_score(1), 1.0);
        let frequent_old = impact_score(0.85, frequency_score(20), 0.0);
        assert!(frequent_old > rare_recent);
    }
}

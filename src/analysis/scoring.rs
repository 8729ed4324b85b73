//! Weighted rule set behind the risk score.
//!
//! Every rule adds a fixed number of points; the total is capped at 100.
//! The thresholds here are contracts: identical records must always score
//! identically, so nothing in this file may depend on time, randomness, or
//! floating-point accumulation.

use crate::models::{HealthRecord, RiskLevel, StressLevel};

/// Symptom tags that carry extra weight on top of the plain symptom count.
pub const HIGH_RISK_SYMPTOMS: &[&str] = &[
    "irregular_cycles",
    "hirsutism",
    "acne",
    "weight_gain",
    "hair_loss",
    "infertility",
];

pub const MAX_SCORE: u32 = 100;

/// Sleep assumed when the record does not say.
const DEFAULT_SLEEP_HOURS: f64 = 7.0;

/// Compute the PCOS risk score (0-100) for a validated record.
pub fn calculate_risk_score(record: &HealthRecord) -> u32 {
    let mut score = 0;

    // Cycle length (0-30)
    let cycle = record.cycle_length;
    if cycle < 21 {
        score += 25;
    } else if cycle > 35 {
        score += 30;
    } else if cycle > 32 {
        score += 15;
    }

    // Period length (0-15)
    let period = record.period_length;
    if period < 3 {
        score += 10;
    } else if period > 7 {
        score += 15;
    }

    // Symptoms (0-40)
    let symptom_count = record.symptoms.len() as u32;
    let high_risk_count = record
        .symptoms
        .iter()
        .filter(|s| HIGH_RISK_SYMPTOMS.contains(s))
        .count() as u32;
    score += (symptom_count.saturating_mul(4)).min(25);
    score += (high_risk_count.saturating_mul(5)).min(15);

    // Peak diagnosis age (0-10)
    if (15..=35).contains(&record.age) {
        score += 10;
    }

    // Lifestyle (0-5)
    if record.stress == Some(StressLevel::High) {
        score += 3;
    }
    if record.sleep.unwrap_or(DEFAULT_SLEEP_HOURS) < 6.0 {
        score += 2;
    }

    score.min(MAX_SCORE)
}

/// Map a score onto its risk band: <30 low, <60 moderate, otherwise high.
pub fn risk_level_for(score: u32) -> RiskLevel {
    if score < 30 {
        RiskLevel::Low
    } else if score < 60 {
        RiskLevel::Moderate
    } else {
        RiskLevel::High
    }
}

/// Narrative for the cycle length (full-mode thresholds, 21-35 normal).
pub fn classify_cycle(cycle_length: u32) -> &'static str {
    if (21..=35).contains(&cycle_length) {
        "within normal range"
    } else if cycle_length < 21 {
        "shorter than typical (may indicate hormonal imbalance)"
    } else {
        "longer than typical (common in PCOS)"
    }
}

/// Narrative for the period length (full-mode thresholds, 3-7 normal).
///
/// Step mode uses 2-7 instead; see `step::PERIOD_NORMAL_RANGE`.
pub fn classify_period(period_length: u32) -> &'static str {
    if (3..=7).contains(&period_length) {
        "within normal range"
    } else if period_length < 3 {
        "shorter than typical"
    } else {
        "longer than typical (may need evaluation)"
    }
}

/// Rough position of the user's cycle length against the dataset average.
///
/// Not a real percentile: equal → 50, shorter → 35, longer → 50 plus 5 per
/// day over the average, capped at 90.
pub fn calculate_percentile(cycle_length: u32, avg_cycle_length: u32) -> u32 {
    match cycle_length.cmp(&avg_cycle_length) {
        std::cmp::Ordering::Less => 35,
        std::cmp::Ordering::Equal => 50,
        std::cmp::Ordering::Greater => {
            let diff = cycle_length - avg_cycle_length;
            diff.saturating_mul(5).saturating_add(50).min(90)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SymptomSet;

    fn record(age: u32, cycle: u32, period: u32, symptoms: &[&str]) -> HealthRecord {
        HealthRecord::new(age, cycle, period, SymptomSet::new(symptoms.iter().copied()))
    }

    #[test]
    fn low_risk_profile() {
        let mut r = record(30, 28, 5, &[]);
        r.stress = Some(StressLevel::Low);
        r.sleep = Some(8.0);
        let score = calculate_risk_score(&r);
        assert_eq!(score, 10);
        assert_eq!(risk_level_for(score), RiskLevel::Low);
    }

    #[test]
    fn high_risk_profile() {
        let mut r = record(
            25,
            45,
            10,
            &["irregular_cycles", "hirsutism", "acne", "weight_gain", "hair_loss"],
        );
        r.stress = Some(StressLevel::High);
        r.sleep = Some(5.0);
        // 30 + 15 + 20 + 15 + 10 + 3 + 2
        assert_eq!(calculate_risk_score(&r), 95);
        assert_eq!(risk_level_for(95), RiskLevel::High);
    }

    #[test]
    fn cycle_rules() {
        assert_eq!(calculate_risk_score(&record(40, 20, 5, &[])), 25);
        assert_eq!(calculate_risk_score(&record(40, 21, 5, &[])), 0);
        assert_eq!(calculate_risk_score(&record(40, 32, 5, &[])), 0);
        assert_eq!(calculate_risk_score(&record(40, 33, 5, &[])), 15);
        assert_eq!(calculate_risk_score(&record(40, 35, 5, &[])), 15);
        assert_eq!(calculate_risk_score(&record(40, 36, 5, &[])), 30);
    }

    #[test]
    fn period_rules() {
        assert_eq!(calculate_risk_score(&record(40, 28, 2, &[])), 10);
        assert_eq!(calculate_risk_score(&record(40, 28, 3, &[])), 0);
        assert_eq!(calculate_risk_score(&record(40, 28, 7, &[])), 0);
        assert_eq!(calculate_risk_score(&record(40, 28, 8, &[])), 15);
    }

    #[test]
    fn symptom_points_are_capped() {
        let many = ["a", "b", "c", "d", "e", "f", "g", "h"];
        assert_eq!(calculate_risk_score(&record(40, 28, 5, &many)), 25);
        assert_eq!(calculate_risk_score(&record(40, 28, 5, HIGH_RISK_SYMPTOMS)), 24 + 15);
    }

    #[test]
    fn age_window_is_inclusive() {
        assert_eq!(calculate_risk_score(&record(14, 28, 5, &[])), 0);
        assert_eq!(calculate_risk_score(&record(15, 28, 5, &[])), 10);
        assert_eq!(calculate_risk_score(&record(35, 28, 5, &[])), 10);
        assert_eq!(calculate_risk_score(&record(36, 28, 5, &[])), 0);
    }

    #[test]
    fn missing_sleep_counts_as_seven_hours() {
        let r = record(40, 28, 5, &[]);
        assert_eq!(calculate_risk_score(&r), 0);
        let mut tired = r.clone();
        tired.sleep = Some(5.9);
        assert_eq!(calculate_risk_score(&tired), 2);
    }

    #[test]
    fn zero_sleep_counts_as_short_sleep() {
        let mut r = record(40, 28, 5, &[]);
        r.sleep = Some(0.0);
        assert_eq!(calculate_risk_score(&r), 2);
    }

    #[test]
    fn unlisted_symptoms_still_count() {
        let r = record(40, 28, 5, &["brain_fog", "fatigue", "dark_patches"]);
        assert_eq!(calculate_risk_score(&r), 12);
    }

    #[test]
    fn score_never_exceeds_cap() {
        let mut r = record(20, 60, 12, HIGH_RISK_SYMPTOMS);
        r.stress = Some(StressLevel::High);
        r.sleep = Some(3.0);
        assert!(calculate_risk_score(&r) <= MAX_SCORE);
    }

    #[test]
    fn monotonic_in_each_factor() {
        let base = record(40, 28, 5, &[]);
        let base_score = calculate_risk_score(&base);

        let mut more_symptoms = base.clone();
        let mut prev = base_score;
        for tags in [vec!["acne"], vec!["acne", "fatigue"], vec!["acne", "fatigue", "hirsutism"]] {
            more_symptoms.symptoms = SymptomSet::new(tags);
            let s = calculate_risk_score(&more_symptoms);
            assert!(s >= prev);
            prev = s;
        }

        let mut long_cycle = base.clone();
        long_cycle.cycle_length = 45;
        assert!(calculate_risk_score(&long_cycle) >= base_score);

        let mut long_period = base.clone();
        long_period.period_length = 10;
        assert!(calculate_risk_score(&long_period) >= base_score);

        let mut stressed = base.clone();
        stressed.stress = Some(StressLevel::Low);
        let low = calculate_risk_score(&stressed);
        stressed.stress = Some(StressLevel::High);
        assert!(calculate_risk_score(&stressed) >= low);

        let mut sleepy = base.clone();
        sleepy.sleep = Some(8.0);
        let rested = calculate_risk_score(&sleepy);
        sleepy.sleep = Some(5.0);
        assert!(calculate_risk_score(&sleepy) >= rested);
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(risk_level_for(0), RiskLevel::Low);
        assert_eq!(risk_level_for(29), RiskLevel::Low);
        assert_eq!(risk_level_for(30), RiskLevel::Moderate);
        assert_eq!(risk_level_for(59), RiskLevel::Moderate);
        assert_eq!(risk_level_for(60), RiskLevel::High);
        assert_eq!(risk_level_for(100), RiskLevel::High);
    }

    #[test]
    fn cycle_and_period_narratives() {
        assert_eq!(classify_cycle(21), "within normal range");
        assert_eq!(classify_cycle(35), "within normal range");
        assert!(classify_cycle(20).starts_with("shorter"));
        assert!(classify_cycle(36).starts_with("longer"));
        assert_eq!(classify_period(3), "within normal range");
        assert_eq!(classify_period(2), "shorter than typical");
        assert!(classify_period(8).starts_with("longer"));
    }

    #[test]
    fn percentile_heuristic() {
        assert_eq!(calculate_percentile(28, 28), 50);
        assert_eq!(calculate_percentile(25, 28), 35);
        assert_eq!(calculate_percentile(32, 28), 70);
        assert_eq!(calculate_percentile(60, 28), 90);
    }
}

//! Incremental per-step feedback for the six-step survey form.
//!
//! Each step reads only its own slice of the payload and never looks at
//! earlier steps. Missing or malformed fields skip their finding; nothing in
//! here can fail.

use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::Serialize;

use crate::models::survey::AGE_RANGE;
use crate::models::{ActivityLevel, PcosStatus, StressLevel, SurveyPayload};

pub const FINAL_STEP: i64 = 6;

/// Step-mode normal cycle range (same as full mode).
pub const CYCLE_NORMAL_RANGE: RangeInclusive<i64> = 21..=35;

/// Step-mode normal period range. Full mode uses 3-7; the two have drifted
/// apart and are kept as they are until the clinical owners pick one.
pub const PERIOD_NORMAL_RANGE: RangeInclusive<i64> = 2..=7;

/// Feedback for one form step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepInsight {
    pub step: i64,
    pub step_name: &'static str,
    pub findings: Vec<String>,
    pub tips: Vec<String>,
    /// Teaser for the following step. `None` (JSON `null`) for the last
    /// step and for any step outside 1-5, including zero and negatives.
    pub next_step_preview: Option<&'static str>,
    pub has_sufficient_data: bool,
}

impl StepInsight {
    fn new(step: i64) -> Self {
        Self {
            step,
            step_name: step_name(step),
            findings: Vec::new(),
            tips: Vec::new(),
            next_step_preview: step.checked_add(1).and_then(step_preview),
            has_sufficient_data: false,
        }
    }

    fn finding(&mut self, text: impl Into<String>) {
        self.findings.push(text.into());
    }

    fn tip(&mut self, text: &str) {
        self.tips.push(text.to_string());
    }
}

pub fn step_name(step: i64) -> &'static str {
    match step {
        1 => "Personal Information",
        2 => "Menstrual Cycle",
        3 => "Symptoms",
        4 => "Lifestyle & Habits",
        5 => "Clinical Information",
        6 => "Review",
        _ => "Unknown",
    }
}

fn step_preview(step: i64) -> Option<&'static str> {
    match step {
        2 => Some("Next: We'll ask about your menstrual cycle details"),
        3 => Some("Next: Select any symptoms you're currently experiencing"),
        4 => Some("Next: Tell us about your daily lifestyle and habits"),
        5 => Some("Next: Share any clinical information and your location"),
        6 => Some("Next: Review all your information before submission"),
        _ => None,
    }
}

/// Analyze the data entered on one step. Unknown steps yield an empty insight.
pub fn analyze_step(step: i64, data: &SurveyPayload) -> StepInsight {
    let mut insight = StepInsight::new(step);

    match step {
        1 => personal_information(data, &mut insight),
        2 => menstrual_cycle(data, &mut insight),
        3 => symptoms(data, &mut insight),
        4 => lifestyle(data, &mut insight),
        5 => clinical_information(data, &mut insight),
        FINAL_STEP => {
            insight.has_sufficient_data = true;
            insight.finding("All information collected. Ready for comprehensive analysis.");
            insight.tip(
                "Click 'Save My Data' to get your complete health report with doctor recommendations.",
            );
        }
        other => tracing::debug!(step = other, "No rules for survey step"),
    }

    insight
}

// ─── Step rules ───────────────────────────────────────────────────────────────

fn personal_information(data: &SurveyPayload, insight: &mut StepInsight) {
    if let Some(age) = data.age.filled() {
        if AGE_RANGE.contains(&age) {
            insight.finding(format!("Age {age} recorded"));
            if (15..=25).contains(&age) {
                insight.tip("PCOS is commonly diagnosed in women aged 15-35.");
            } else if (26..=35).contains(&age) {
                insight.tip("This is a common age range for PCOS diagnosis.");
            }
        }
    }

    if let (Some(weight), Some(height)) = (data.weight.filled(), data.height.filled()) {
        if let Some(bmi) = bmi(weight, height) {
            insight.finding(format!("BMI: {bmi:.1} ({})", bmi_category(bmi)));
            if bmi > 25.0 {
                insight.tip("Weight management can help improve PCOS symptoms.");
            }
        }
    }
}

fn menstrual_cycle(data: &SurveyPayload, insight: &mut StepInsight) {
    if let Some(cycle) = data.cycle_length.filled() {
        if CYCLE_NORMAL_RANGE.contains(&cycle) {
            insight.finding(format!("Cycle length: {cycle} days (normal range)"));
        } else if cycle < *CYCLE_NORMAL_RANGE.start() {
            insight.finding(format!("Cycle length: {cycle} days (shorter than typical)"));
            insight.tip("Short cycles may indicate hormonal imbalances.");
        } else {
            insight.finding(format!("Cycle length: {cycle} days (longer than typical)"));
            insight.tip("Longer cycles are common with PCOS.");
        }
    }

    if let Some(period) = data.period_length.filled() {
        let band = if PERIOD_NORMAL_RANGE.contains(&period) {
            "normal range"
        } else if period < *PERIOD_NORMAL_RANGE.start() {
            "shorter than typical"
        } else {
            "longer than typical"
        };
        insight.finding(format!("Period length: {period} days ({band})"));
    }
}

fn symptoms(data: &SurveyPayload, insight: &mut StepInsight) {
    if data.symptoms.is_malformed() {
        return;
    }
    let Some(symptoms) = data.symptoms.as_ref().filter(|s| !s.is_empty()) else {
        insight.finding("No symptoms selected");
        insight.tip("Adding symptoms helps us understand your health better.");
        return;
    };

    insight.finding(format!("{} symptom(s) reported", symptoms.len()));
    if symptoms.contains("irregular_cycles") {
        insight.tip("Irregular cycles are a key PCOS indicator.");
    }
    if symptoms.contains("weight_gain") {
        insight.tip("Weight changes may relate to insulin resistance.");
    }
    if symptoms.contains_any(&["hirsutism", "acne"]) {
        insight.tip("These symptoms often improve with hormonal treatments.");
    }
    if symptoms.len() >= 5 {
        insight.tip("Multiple symptoms reported. A comprehensive checkup is recommended.");
    }
}

fn lifestyle(data: &SurveyPayload, insight: &mut StepInsight) {
    if let Some(activity) = data.activity.filled() {
        let parsed = ActivityLevel::from_str(activity.trim()).ok();
        let label = parsed.map(|a| a.label().to_string()).unwrap_or(activity);
        insight.finding(format!("Activity level: {label}"));
        if parsed == Some(ActivityLevel::Sedentary) {
            insight.tip("Regular exercise improves insulin sensitivity.");
        }
    }

    if let Some(hours) = data.sleep.filled() {
        insight.finding(format!("Sleep: {} hours/night", format_hours(hours)));
        if hours < 6.0 {
            insight.tip("Poor sleep can worsen PCOS symptoms. Aim for 7-8 hours.");
        }
    }

    if let Some(stress) = data.stress.filled() {
        let parsed = StressLevel::from_str(stress.trim()).ok();
        let label = parsed.map(|s| s.label().to_string()).unwrap_or(stress);
        insight.finding(format!("Stress level: {label}"));
        if parsed == Some(StressLevel::High) {
            insight.tip("High stress affects hormones. Try yoga or meditation.");
        }
    }
}

fn clinical_information(data: &SurveyPayload, insight: &mut StepInsight) {
    if let Some(city) = data.city.filled() {
        insight.finding(format!("Location: {}", city.trim()));
        insight.tip("Based on your location, we'll recommend nearby specialists if needed.");
    }

    if let Some(status) = data.pcos.filled() {
        let parsed = PcosStatus::from_str(status.trim()).ok();
        let label = parsed.map(|p| p.label().to_string()).unwrap_or(status);
        insight.finding(format!("PCOS status: {label}"));
        match parsed {
            Some(PcosStatus::Diagnosed) => {
                insight.tip("Regular follow-ups with your doctor help manage PCOS effectively.")
            }
            Some(PcosStatus::Suspected) => insight.tip("Getting proper tests can confirm diagnosis."),
            _ => {}
        }
    }

    insight.tip("Great! Almost done. The next step will show a summary.");
}

// ─── BMI ──────────────────────────────────────────────────────────────────────

/// Body-mass index from kilograms and centimetres. `None` when the inputs
/// cannot produce a finite value.
pub fn bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    let height_m = height_cm / 100.0;
    let value = weight_kg / (height_m * height_m);
    value.is_finite().then_some(value)
}

pub fn bmi_category(bmi: f64) -> &'static str {
    if bmi < 18.5 {
        "Underweight"
    } else if bmi < 25.0 {
        "Normal"
    } else if bmi < 30.0 {
        "Overweight"
    } else {
        "Obese"
    }
}

/// Hours always carry a decimal point: `7.0`, `6.5`.
fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{hours:.1}")
    } else {
        hours.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn step(n: i64, data: Value) -> StepInsight {
        let payload: SurveyPayload = serde_json::from_value(data).unwrap();
        analyze_step(n, &payload)
    }

    #[test]
    fn step_one_records_age_and_bmi() {
        let insight = step(1, json!({"age": 22, "weight": 70, "height": 160}));
        assert_eq!(insight.step_name, "Personal Information");
        assert_eq!(insight.findings, vec!["Age 22 recorded", "BMI: 27.3 (Overweight)"]);
        assert_eq!(
            insight.tips,
            vec![
                "PCOS is commonly diagnosed in women aged 15-35.",
                "Weight management can help improve PCOS symptoms.",
            ]
        );
        assert_eq!(
            insight.next_step_preview,
            Some("Next: We'll ask about your menstrual cycle details")
        );
        assert!(!insight.has_sufficient_data);
    }

    #[test]
    fn step_one_age_outside_range_is_ignored() {
        let insight = step(1, json!({"age": 90}));
        assert!(insight.findings.is_empty());
        let insight = step(1, json!({"age": 30}));
        assert_eq!(insight.tips, vec!["This is a common age range for PCOS diagnosis."]);
    }

    #[test]
    fn step_one_malformed_weight_skips_bmi_only() {
        let insight = step(1, json!({"age": 40, "weight": "heavy", "height": 160}));
        assert_eq!(insight.findings, vec!["Age 40 recorded"]);
        assert!(insight.tips.is_empty());
    }

    #[test]
    fn step_two_uses_step_mode_period_range() {
        let insight = step(2, json!({"cycle_length": "40", "period_length": 2}));
        assert_eq!(
            insight.findings,
            vec![
                "Cycle length: 40 days (longer than typical)",
                "Period length: 2 days (normal range)",
            ]
        );
        assert_eq!(insight.tips, vec!["Longer cycles are common with PCOS."]);
    }

    #[test]
    fn step_two_short_cycle_and_long_period() {
        let insight = step(2, json!({"cycle_length": 18, "period_length": 9}));
        assert_eq!(insight.findings[0], "Cycle length: 18 days (shorter than typical)");
        assert_eq!(insight.findings[1], "Period length: 9 days (longer than typical)");
        assert_eq!(insight.tips, vec!["Short cycles may indicate hormonal imbalances."]);
    }

    #[test]
    fn step_two_malformed_cycle_keeps_period() {
        let insight = step(2, json!({"cycle_length": "about a month", "period_length": 5}));
        assert_eq!(insight.findings, vec!["Period length: 5 days (normal range)"]);
    }

    #[test]
    fn step_three_symptom_tips() {
        let insight = step(
            3,
            json!({"symptoms": ["irregular_cycles", "weight_gain", "acne", "hair_loss", "fatigue"]}),
        );
        assert_eq!(insight.findings, vec!["5 symptom(s) reported"]);
        assert_eq!(insight.tips.len(), 4);
        assert_eq!(
            insight.tips.last().unwrap(),
            "Multiple symptoms reported. A comprehensive checkup is recommended."
        );
    }

    #[test]
    fn step_three_without_symptoms() {
        let insight = step(3, json!({}));
        assert_eq!(insight.findings, vec!["No symptoms selected"]);
        assert_eq!(insight.tips, vec!["Adding symptoms helps us understand your health better."]);
    }

    #[test]
    fn step_four_lifestyle_tips() {
        let insight = step(4, json!({"activity": "sedentary", "sleep": 5, "stress": "high"}));
        assert_eq!(
            insight.findings,
            vec!["Activity level: Sedentary", "Sleep: 5.0 hours/night", "Stress level: High"]
        );
        assert_eq!(insight.tips.len(), 3);
    }

    #[test]
    fn step_four_unknown_labels_are_echoed() {
        let insight = step(4, json!({"activity": "athlete", "sleep": "7.5"}));
        assert_eq!(insight.findings, vec!["Activity level: athlete", "Sleep: 7.5 hours/night"]);
        assert!(insight.tips.is_empty());
    }

    #[test]
    fn step_five_location_and_status() {
        let insight = step(5, json!({"city": "Pune", "pcos": "suspected"}));
        assert_eq!(insight.findings, vec!["Location: Pune", "PCOS status: Suspected PCOS"]);
        assert_eq!(insight.tips.len(), 3);
        assert_eq!(insight.tips[1], "Getting proper tests can confirm diagnosis.");
        assert_eq!(insight.tips[2], "Great! Almost done. The next step will show a summary.");
    }

    #[test]
    fn step_six_is_terminal() {
        let insight = step(6, json!({"age": 25}));
        assert!(insight.has_sufficient_data);
        assert_eq!(insight.findings.len(), 1);
        assert_eq!(insight.next_step_preview, None);
    }

    #[test]
    fn unknown_steps_produce_empty_insight() {
        for n in [0, 7, 42, -1, i64::MIN, i64::MAX] {
            let insight = step(n, json!({"age": 25, "city": "Delhi"}));
            assert_eq!(insight.step_name, "Unknown");
            assert!(insight.findings.is_empty());
            assert!(insight.tips.is_empty());
            assert!(!insight.has_sufficient_data);
            assert_eq!(insight.next_step_preview, None);
        }
    }

    #[test]
    fn steps_are_independent_of_other_fields() {
        let alone = step(2, json!({"cycle_length": 30}));
        let noisy = step(2, json!({"cycle_length": 30, "age": 19, "symptoms": ["acne"]}));
        assert_eq!(alone, noisy);
    }

    #[test]
    fn bmi_categories() {
        assert_eq!(bmi_category(18.4), "Underweight");
        assert_eq!(bmi_category(18.5), "Normal");
        assert_eq!(bmi_category(25.0), "Overweight");
        assert_eq!(bmi_category(30.0), "Obese");
        assert!(bmi(60.0, 0.0).is_none());
    }
}

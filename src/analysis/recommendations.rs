//! Recommendation list and summary prose for a finished assessment.

use crate::models::{ActivityLevel, HealthRecord, RiskLevel, StressLevel};

/// Truncation is positional: the append order below is the priority order.
pub const MAX_RECOMMENDATIONS: usize = 8;

/// Build the ordered recommendation list for a record at a given risk level.
pub fn generate_recommendations(record: &HealthRecord, risk_level: RiskLevel) -> Vec<String> {
    let mut recs = Recommendations::default();

    match risk_level {
        RiskLevel::High => {
            recs.push("⚠️ Consult a gynecologist or endocrinologist soon");
            recs.push("Schedule hormone panel tests (LH, FSH, testosterone, insulin)");
            recs.push("Consider pelvic ultrasound to check for ovarian cysts");
        }
        RiskLevel::Moderate => {
            recs.push("Schedule a checkup with a gynecologist within 1-2 months");
            recs.push("Start tracking your cycles and symptoms consistently");
        }
        RiskLevel::Low => {
            recs.push("Continue monitoring your cycles regularly");
        }
    }

    let symptoms = &record.symptoms;

    if symptoms.contains("weight_gain") {
        recs.push("Consider consulting a nutritionist for diet management");
        recs.push("Regular exercise can help with insulin sensitivity");
    }
    if symptoms.contains_any(&["acne", "hirsutism"]) {
        recs.push("Dermatologist consultation may help with skin/hair concerns");
    }
    if symptoms.contains("irregular_cycles") {
        recs.push("Track ovulation with BBT or ovulation kits");
    }
    if symptoms.contains("infertility") {
        recs.push("Fertility specialist consultation recommended");
    }
    if symptoms.contains("mood_changes") || record.stress == Some(StressLevel::High) {
        recs.push("Consider mental health support or stress management therapy");
    }

    if record.sleep.is_some_and(|h| h < 6.0) {
        recs.push("Improve sleep hygiene - aim for 7-8 hours nightly");
    }
    if matches!(record.activity, Some(ActivityLevel::Sedentary | ActivityLevel::Light)) {
        recs.push("Increase physical activity - aim for 150 min/week moderate exercise");
    }

    recs.into_capped()
}

/// Template summary keyed by risk level.
pub fn create_summary(record: &HealthRecord, risk_level: RiskLevel) -> String {
    let opening = format!(
        "Based on your health data (age {}, {} symptoms reported), ",
        record.age,
        record.symptoms.len()
    );
    let body = match risk_level {
        RiskLevel::High => {
            "you show several indicators commonly associated with PCOS. \
             We strongly recommend consulting a healthcare provider for proper diagnosis and treatment."
        }
        RiskLevel::Moderate => {
            "you show some indicators that may warrant further evaluation. \
             Consider scheduling a checkup with a gynecologist to discuss your symptoms."
        }
        RiskLevel::Low => {
            "your symptoms appear mild. \
             Continue monitoring your health and maintain a healthy lifestyle."
        }
    };
    opening + body
}

#[derive(Default)]
struct Recommendations(Vec<String>);

impl Recommendations {
    fn push(&mut self, text: &str) {
        if !self.0.iter().any(|r| r == text) {
            self.0.push(text.to_string());
        }
    }

    fn into_capped(mut self) -> Vec<String> {
        self.0.truncate(MAX_RECOMMENDATIONS);
        self.0
    }
}

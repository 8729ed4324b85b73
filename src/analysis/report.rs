//! Printable health report assembled from a finished assessment.

use serde::Serialize;

use super::RiskAssessment;
use crate::models::{HealthRecord, RiskLevel};

const LIFESTYLE_TIPS: [&str; 5] = [
    "Exercise 30 minutes daily to improve insulin sensitivity",
    "Maintain a balanced diet low in processed foods",
    "Get 7-8 hours of quality sleep",
    "Manage stress through yoga or meditation",
    "Track your cycle consistently for pattern recognition",
];

const WHEN_TO_SEE_DOCTOR: [&str; 5] = [
    "If irregular periods persist for more than 3 months",
    "Experiencing severe pelvic pain",
    "Difficulty conceiving after 6-12 months of trying",
    "Sudden weight changes or severe acne",
    "Heavy bleeding or periods lasting > 7 days",
];

const NEXT_STEPS: [&str; 5] = [
    "Consult with recommended gynecologist",
    "Get hormone level tests (testosterone, LH, FSH)",
    "Consider ultrasound if PCOS suspected",
    "Track symptoms for next 2-3 cycles",
    "Book appointment with nutritionist if needed",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetComparison {
    pub your_cycle: u32,
    pub dataset_average: u32,
    pub percentile: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub summary: String,
    pub risk_level: RiskLevel,
    pub risk_score: u32,
    pub key_findings: Vec<String>,
    pub recommendations: Vec<String>,
    pub lifestyle_tips: Vec<&'static str>,
    pub when_to_see_doctor: Vec<&'static str>,
    pub next_steps: Vec<&'static str>,
    pub comparison_to_dataset: DatasetComparison,
}

pub fn generate_report(record: &HealthRecord, assessment: &RiskAssessment) -> HealthReport {
    let key_findings = vec![
        format!(
            "Your cycle length ({} days) is {}",
            record.cycle_length, assessment.cycle_status
        ),
        format!(
            "Period length ({} days) is {}",
            record.period_length, assessment.period_status
        ),
        format!("Risk level: {}", assessment.risk_level.as_str().to_uppercase()),
        format!("{} symptoms reported", record.symptoms.len()),
    ];

    HealthReport {
        summary: assessment.summary.clone(),
        risk_level: assessment.risk_level,
        risk_score: assessment.risk_score,
        key_findings,
        recommendations: assessment.recommendations.clone(),
        lifestyle_tips: LIFESTYLE_TIPS.to_vec(),
        when_to_see_doctor: WHEN_TO_SEE_DOCTOR.to_vec(),
        next_steps: NEXT_STEPS.to_vec(),
        comparison_to_dataset: DatasetComparison {
            your_cycle: record.cycle_length,
            dataset_average: assessment.dataset_avg_cycle,
            percentile: assessment.percentile,
        },
    }
}

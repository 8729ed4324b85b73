//! Risk Analyzer.
//!
//! Two entry points: `analyze_step` gives live feedback on a single survey
//! step from partial data, and `analyze` scores a validated `HealthRecord`.
//! Both are pure; the only shared state is the statistics cache, which the
//! caller resolves before calling `analyze`.

pub mod recommendations;
pub mod report;
pub mod scoring;
pub mod statistics;
pub mod step;

use serde::Serialize;

use crate::models::{HealthRecord, RiskLevel};

pub use recommendations::{create_summary, generate_recommendations};
pub use report::{generate_report, HealthReport};
pub use scoring::{
    calculate_percentile, calculate_risk_score, classify_cycle, classify_period, risk_level_for,
};
pub use statistics::{compute_statistics, DatasetStatistics, StatisticsCache};
pub use step::{analyze_step, StepInsight};

/// Result of a full-mode analysis. Built fresh per call, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    pub cycle_status: String,
    pub period_status: String,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub dataset_avg_cycle: u32,
    pub dataset_avg_period: u32,
    pub percentile: u32,
}

/// Score a validated record against the population statistics.
pub fn analyze(record: &HealthRecord, stats: &DatasetStatistics) -> RiskAssessment {
    let risk_score = calculate_risk_score(record);
    let risk_level = risk_level_for(risk_score);

    tracing::debug!(risk_score, risk_level = %risk_level, "Assessment scored");

    RiskAssessment {
        risk_score,
        risk_level,
        cycle_status: classify_cycle(record.cycle_length).to_string(),
        period_status: classify_period(record.period_length).to_string(),
        summary: create_summary(record, risk_level),
        recommendations: generate_recommendations(record, risk_level),
        dataset_avg_cycle: stats.avg_cycle_length,
        dataset_avg_period: stats.avg_period_length,
        percentile: calculate_percentile(record.cycle_length, stats.avg_cycle_length),
    }
}

//! Survey analysis endpoints: live per-step feedback and the full assessment.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{self, HealthReport, RiskAssessment, StepInsight};
use crate::api::error::ApiError;
use crate::api::sanitize::sanitize_survey;
use crate::api::types::ApiContext;
use crate::doctors::RecommendationBundle;
use crate::models::{Lenient, SurveyPayload};

const DEFAULT_STEP: i64 = 1;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StepRequest {
    pub step: Lenient<i64>,
    #[serde(rename = "stepData")]
    pub step_data: SurveyPayload,
}

#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub success: bool,
    pub step: i64,
    pub analysis: StepInsight,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    /// `None` when persistence is disabled or the save failed.
    pub entry_id: Option<Uuid>,
    pub analysis: RiskAssessment,
    pub doctors: RecommendationBundle,
    pub report: HealthReport,
}

/// `POST /api/analyze-step`: insight for one survey step from partial data.
pub async fn analyze_step(
    payload: Result<Json<StepRequest>, JsonRejection>,
) -> Result<Json<StepResponse>, ApiError> {
    let Json(mut request) = payload?;

    let step = match request.step {
        Lenient::Missing => DEFAULT_STEP,
        Lenient::Value(step) => step,
        Lenient::Malformed => return Err(ApiError::BadRequest("step must be a whole number".into())),
    };

    sanitize_survey(&mut request.step_data);
    let analysis = analysis::analyze_step(step, &request.step_data);

    Ok(Json(StepResponse { success: true, step, analysis }))
}

/// `POST /api/analyze`: full assessment, practitioner shortlist, and report.
///
/// Rejects the request with every offending field listed when a required
/// field is missing or out of range. A failed save does not fail the request.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    payload: Result<Json<SurveyPayload>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(mut payload) = payload?;
    sanitize_survey(&mut payload);
    let record = payload.validate()?;

    let core = ctx.core.clone();
    let response = tokio::task::spawn_blocking(move || {
        let stats = core.statistics();
        let assessment = analysis::analyze(&record, &stats);
        let entry_id = core.save_entry(&record, &assessment);
        let doctors = core.directory().get_recommendations(
            record.city.as_deref().unwrap_or_default(),
            assessment.risk_level,
            &record.symptoms,
        );
        let report = analysis::generate_report(&record, &assessment);

        AnalyzeResponse { success: true, entry_id, analysis: assessment, doctors, report }
    })
    .await?;

    tracing::info!(
        risk_level = %response.analysis.risk_level,
        stored = response.entry_id.is_some(),
        "Assessment completed"
    );

    Ok(Json(response))
}

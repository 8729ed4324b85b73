//! Dataset statistics endpoint.

use axum::extract::State;
use axum::Json;

use crate::analysis::DatasetStatistics;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// `GET /api/stats`: cached population statistics.
pub async fn get(State(ctx): State<ApiContext>) -> Result<Json<DatasetStatistics>, ApiError> {
    let core = ctx.core.clone();
    let stats = tokio::task::spawn_blocking(move || core.statistics()).await?;
    Ok(Json(DatasetStatistics::clone(&stats)))
}

//! Practitioner directory endpoints.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::sanitize::{normalize_symptoms, sanitize_text};
use crate::api::types::ApiContext;
use crate::doctors::{DirectoryMatch, RecommendationBundle};
use crate::models::{RiskLevel, SymptomSet};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecommendationQuery {
    pub city: String,
    pub severity: Option<String>,
    /// Comma-separated symptom tags.
    pub symptoms: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub name: String,
}

/// Missing severity means moderate; anything unrecognized is treated as low.
fn parse_severity(raw: Option<&str>) -> RiskLevel {
    match raw.map(str::trim) {
        None | Some("") => RiskLevel::Moderate,
        Some(s) => s.parse().unwrap_or(RiskLevel::Low),
    }
}

/// `GET /api/doctors?city=&severity=&symptoms=a,b`
pub async fn recommend(
    State(ctx): State<ApiContext>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> Result<Json<RecommendationBundle>, ApiError> {
    let Query(query) = query?;

    let city = sanitize_text(&query.city);
    let severity = parse_severity(query.severity.as_deref());
    let symptoms = normalize_symptoms(&SymptomSet::new(query.symptoms.split(',')));

    Ok(Json(ctx.core.directory().get_recommendations(&city, severity, &symptoms)))
}

/// `GET /api/doctors/cities`
pub async fn cities(State(ctx): State<ApiContext>) -> Json<Vec<String>> {
    Json(ctx.core.directory().all_cities())
}

/// `GET /api/doctors/search?name=`
pub async fn search(
    State(ctx): State<ApiContext>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<DirectoryMatch>>, ApiError> {
    let Query(query) = query?;
    let name = sanitize_text(&query.name);
    if name.is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()));
    }
    Ok(Json(ctx.core.directory().search_by_name(&name)))
}

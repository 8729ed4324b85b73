//! Health check endpoint.

use axum::Json;
use serde::Serialize;

use crate::config::{APP_VERSION, SERVICE_NAME};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// `GET /health`: liveness check.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: APP_VERSION,
    })
}

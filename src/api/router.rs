//! HTTP router.
//!
//! Middleware stack (outermost → innermost):
//! 1. CORS → 2. Security headers → 3. Body limit → 4. Rate limiter →
//! 5. Request logger → Handler

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::error::ApiError;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Request bodies above this size are rejected with 413.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the service router.
///
/// Middleware uses `Extension<ApiContext>` (injected outside the rate
/// limiter). Endpoint handlers use `State<ApiContext>` (via `with_state`).
/// An empty `cors_origins` allows any origin.
pub fn api_router(ctx: ApiContext, cors_origins: &[String]) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/api/analyze-step", post(endpoints::analyze::analyze_step))
        .route("/api/analyze", post(endpoints::analyze::analyze))
        .route("/api/stats", get(endpoints::stats::get))
        .route("/api/doctors", get(endpoints::doctors::recommend))
        .route("/api/doctors/cities", get(endpoints::doctors::cities))
        .route("/api/doctors/search", get(endpoints::doctors::search))
        .fallback(not_found)
        .with_state(ctx.clone());

    // Layers are applied from bottom (innermost) to top (outermost).
    routes
        .layer(axum::middleware::from_fn(middleware::logging::log_request))
        .layer(axum::middleware::from_fn(middleware::rate::limit))
        .layer(axum::Extension(ctx))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(cors_layer(cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-requested-with")]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("No such route".into())
}

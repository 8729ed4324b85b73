//! HTTP surface of the assistant.
//!
//! Routes live under `/api/` plus an unauthenticated `/health` probe. Every
//! request passes through CORS, security headers, a body limit, the rate
//! limiter and the request logger before it reaches a handler.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod sanitize;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_server, ApiServer, ServerError};
pub use types::{ApiContext, InMemoryRateLimiter, RateLimitStore};

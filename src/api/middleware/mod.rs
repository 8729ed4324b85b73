//! HTTP middleware.
//!
//! Execution order (outermost → innermost), after the tower-http layers
//! applied in `router`:
//! 1. Rate limiter: rejects before any work is done
//! 2. Request logger: method, path, status, latency

pub mod logging;
pub mod rate;

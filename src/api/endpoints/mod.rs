//! API endpoint handlers.
//!
//! Handlers stay thin: decode, sanitize, then call into `analysis` and
//! `doctors`. Store access goes through `spawn_blocking`.

pub mod analyze;
pub mod doctors;
pub mod health;
pub mod stats;

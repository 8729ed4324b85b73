//! Shared types for the HTTP layer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::core_state::CoreState;

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(3600);

/// Tracked clients beyond which idle windows are pruned.
const PRUNE_THRESHOLD: usize = 10_000;

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
    pub rate_limiter: Arc<dyn RateLimitStore>,
}

impl ApiContext {
    /// Context with the default in-memory limiter.
    pub fn new(core: Arc<CoreState>) -> Self {
        Self::with_limiter(core, Arc::new(InMemoryRateLimiter::new()))
    }

    pub fn with_limiter(core: Arc<CoreState>, rate_limiter: Arc<dyn RateLimitStore>) -> Self {
        Self { core, rate_limiter }
    }

    /// Context with limits taken from the configuration.
    pub fn from_config(core: Arc<CoreState>, config: &Config) -> Self {
        let limiter =
            InMemoryRateLimiter::with_limits(config.rate_limit_per_minute, config.rate_limit_per_hour);
        Self::with_limiter(core, Arc::new(limiter))
    }
}

// ═══════════════════════════════════════════════════════════
// Rate limiting
// ═══════════════════════════════════════════════════════════

/// Request budget per client key. Swap the implementation to share limits
/// across processes.
pub trait RateLimitStore: Send + Sync {
    /// Record one request for `key`. Returns `Err(retry_after_secs)` when the
    /// request is over budget; rejected requests are not counted.
    fn check(&self, key: &str) -> Result<(), u64>;
}

/// Per-client sliding window with per-minute and per-hour limits.
pub struct InMemoryRateLimiter {
    windows: Mutex<HashMap<String, Vec<Instant>>>,
    per_minute: u32,
    per_hour: u32,
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self::with_limits(100, 1000)
    }

    pub fn with_limits(per_minute: u32, per_hour: u32) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            per_minute,
            per_hour,
        }
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), u64> {
        // Window data stays valid even if a holder panicked.
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        if windows.len() > PRUNE_THRESHOLD {
            windows.retain(|_, entries| {
                entries.last().is_some_and(|ts| now.duration_since(*ts) < HOUR)
            });
        }

        let entries = windows.entry(key.to_string()).or_default();

        // Clean entries older than 1 hour
        entries.retain(|ts| now.duration_since(*ts) < HOUR);

        // Check per-minute
        let in_last_minute: Vec<&Instant> =
            entries.iter().filter(|ts| now.duration_since(**ts) < MINUTE).collect();
        if in_last_minute.len() as u32 >= self.per_minute {
            return Err(retry_after(now, in_last_minute.first().copied(), MINUTE));
        }

        // Check per-hour
        if entries.len() as u32 >= self.per_hour {
            return Err(retry_after(now, entries.first(), HOUR));
        }

        entries.push(now);
        Ok(())
    }
}

impl RateLimitStore for InMemoryRateLimiter {
    fn check(&self, key: &str) -> Result<(), u64> {
        self.check_at(key, Instant::now())
    }
}

impl Default for InMemoryRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole seconds until the oldest entry leaves the window, at least 1.
fn retry_after(now: Instant, oldest: Option<&Instant>, window: Duration) -> u64 {
    let remaining = oldest
        .map(|ts| window.saturating_sub(now.duration_since(*ts)))
        .unwrap_or(window);
    remaining.as_secs_f64().ceil().max(1.0) as u64
}

// In crates/engine/src/cache.rs

use std::time::{Duration, Instant};

use core_types::CandleSeries;

/// The last fetched window and when it arrived.
#[derive(Debug, Clone)]
pub struct CachedSeries {
    pub value: CandleSeries,
    pub fetched_at: Instant,
}

impl CachedSeries {
    pub fn new(value: CandleSeries, fetched_at: Instant) -> Self {
        Self { value, fetched_at }
    }

    /// A zero `ttl` disables reuse.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

//! Time utilities for the simulation clock

use std::time::{Duration, Instant};

/// Default tick interval in milliseconds (50 ticks per second)
pub const DEFAULT_TICK_MS: u32 = 20;

/// Convert a tick interval into a tokio-compatible duration
pub fn tick_duration(tick_ms: u32) -> Duration {
    Duration::from_millis(u64::from(tick_ms))
}

/// Number of whole ticks covering `millis` at the given interval
pub fn ticks_for(millis: u32, tick_ms: u32) -> u32 {
    if tick_ms == 0 {
        return 0;
    }
    millis / tick_ms
}

/// Simulated time covered by `ticks` at the given interval
pub fn simulated_millis(ticks: u64, tick_ms: u32) -> u64 {
    ticks.saturating_mul(u64::from(tick_ms))
}

/// A simple timer for measuring wall-clock durations
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

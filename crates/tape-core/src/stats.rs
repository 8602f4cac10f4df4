//! Histogram-based statistics for tick execution time.
//!
//! The tick loop measures how long each simulate→evaluate→broadcast cycle
//! takes and records it here. Periodically (every N ticks) the scheduler logs
//! a summary and resets the collector. This surfaces a slow alert store or a
//! pathological subscriber set without any external metrics stack.
//!
//! The histogram uses fixed 500µs bins up to 1s (2000 bins). Samples above
//! 1s are clamped to the last bin.

use std::time::Duration;

/// Width of each histogram bin in microseconds.
const BIN_WIDTH_US: u64 = 500;

/// Number of histogram bins (covers 0–1s).
const NUM_BINS: usize = 2000;

/// Computed tick-duration statistics.
#[derive(Debug, Clone, Copy)]
pub struct TickDurationSummary {
    pub count: u64,
    pub min_us: u64,
    pub max_us: u64,
    pub avg_us: f64,
    pub p50_us: u64,
    pub p90_us: u64,
    pub p99_us: u64,
}

impl std::fmt::Display for TickDurationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "n={} min={}µs max={}µs avg={:.1}µs p50={}µs p90={}µs p99={}µs",
            self.count, self.min_us, self.max_us, self.avg_us, self.p50_us, self.p90_us, self.p99_us,
        )
    }
}

/// A histogram-based collector of tick wall durations.
///
/// Not thread-safe — the tick task owns its instance.
pub struct TickDurationStats {
    bins: Vec<u64>,
    count: u64,
    sum: u64,
    min: u64,
    max: u64,
}

impl TickDurationStats {
    /// Create a new, empty collector.
    pub fn new() -> Self {
        Self { bins: vec![0u64; NUM_BINS], count: 0, sum: 0, min: u64::MAX, max: 0 }
    }

    /// Record one tick's wall duration.
    pub fn record(&mut self, elapsed: Duration) {
        let us = elapsed.as_micros() as u64;
        self.count += 1;
        self.sum += us;
        self.min = self.min.min(us);
        self.max = self.max.max(us);

        let bin = (us / BIN_WIDTH_US) as usize;
        self.bins[bin.min(NUM_BINS - 1)] += 1;
    }

    /// Returns the number of recorded ticks.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Compute summary statistics. Returns `None` if no ticks recorded.
    pub fn summary(&self) -> Option<TickDurationSummary> {
        if self.count == 0 {
            return None;
        }

        Some(TickDurationSummary {
            count: self.count,
            min_us: self.min,
            max_us: self.max,
            avg_us: self.sum as f64 / self.count as f64,
            p50_us: self.percentile(0.50),
            p90_us: self.percentile(0.90),
            p99_us: self.percentile(0.99),
        })
    }

    /// Reset all counters and bins.
    pub fn reset(&mut self) {
        self.bins.fill(0);
        self.count = 0;
        self.sum = 0;
        self.min = u64::MAX;
        self.max = 0;
    }

    /// Compute the value at the given percentile (0.0–1.0).
    fn percentile(&self, pct: f64) -> u64 {
        let target = (self.count as f64 * pct).ceil() as u64;
        let mut cumulative = 0u64;
        for (i, &count) in self.bins.iter().enumerate() {
            cumulative += count;
            if cumulative >= target {
                return (i as u64) * BIN_WIDTH_US;
            }
        }
        // All samples are above the histogram range
        self.max
    }
}

impl Default for TickDurationStats {
    fn default() -> Self {
        Self::new()
    }
}

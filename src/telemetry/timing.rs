//! Per-repetition timing samples.

use crate::error::{Error, Result};
use hdrhistogram::Histogram;
use std::time::{Duration, Instant};

/// Longest duration tracked by the histogram: one hour, in nanoseconds.
const MAX_TRACKED_NS: u64 = 3_600_000_000_000;

/// Wall-clock durations of repeated runs of one computation.
#[derive(Debug)]
pub struct TimingSample {
    histogram: Histogram<u64>,
    total: Duration,
    min: Option<Duration>,
    max: Duration,
    runs: u32,
}

impl TimingSample {
    /// Create an empty sample.
    pub fn new() -> Result<Self> {
        // 3 significant figures
        let histogram = Histogram::new_with_max(MAX_TRACKED_NS, 3)
            .map_err(|e| Error::telemetry(format!("failed to create histogram: {}", e)))?;

        Ok(Self {
            histogram,
            total: Duration::ZERO,
            min: None,
            max: Duration::ZERO,
            runs: 0,
        })
    }

    /// Record one run.
    pub fn record(&mut self, elapsed: Duration) {
        let ns = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.histogram.saturating_record(ns);

        self.total += elapsed;
        self.min = Some(self.min.map_or(elapsed, |m| m.min(elapsed)));
        self.max = self.max.max(elapsed);
        self.runs += 1;
    }

    /// Run `f` once and record how long it took.
    pub fn time<R, F: FnOnce() -> R>(&mut self, f: F) -> R {
        let start = Instant::now();
        let result = f();
        self.record(start.elapsed());
        result
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Aggregate the runs recorded so far.
    pub fn summary(&self) -> TimingSummary {
        let mean = if self.runs == 0 {
            Duration::ZERO
        } else {
            self.total / self.runs
        };

        TimingSummary {
            runs: self.runs,
            mean,
            min: self.min.unwrap_or(Duration::ZERO),
            max: self.max,
            p50: Duration::from_nanos(self.histogram.value_at_quantile(0.50)),
            p99: Duration::from_nanos(self.histogram.value_at_quantile(0.99)),
        }
    }
}

/// Aggregate view of a [`TimingSample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimingSummary {
    pub runs: u32,
    /// Exact mean over all runs
    pub mean: Duration,
    pub min: Duration,
    pub max: Duration,
    /// Histogram estimate, 3 significant figures
    pub p50: Duration,
    pub p99: Duration,
}

impl TimingSummary {
    /// Mean in milliseconds.
    pub fn mean_ms(&self) -> f64 {
        self.mean.as_secs_f64() * 1e3
    }
}

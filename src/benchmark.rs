//! Sequential vs. parallel array-sum benchmark.
//!
//! Both paths run the configured number of repetitions on the same inputs;
//! the final outputs are compared elementwise and the mean times reported.

use crate::config::BenchConfig;
use crate::error::Result;
use crate::sum::{equal, seq_sum, ArraySum};
use crate::telemetry::{TimingSample, TimingSummary};
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of one benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchReport {
    /// Name of the parallel backend
    pub device: String,
    pub array_len: usize,
    pub repetitions: usize,
    /// `(a[0], b[0], c_par[0])`, absent for empty arrays
    pub first: Option<(i32, i32, i32)>,
    pub sequential: TimingSummary,
    pub parallel: TimingSummary,
    /// `None` when the parallel time is zero
    pub speedup_percent: Option<f64>,
    pub passed: bool,
}

/// Percentage by which `par` beats `seq`: `(seq - par) / par * 100`.
///
/// Returns `None` when `par` is zero.
pub fn speedup_percent(seq: Duration, par: Duration) -> Option<f64> {
    if par.is_zero() {
        return None;
    }
    let seq = seq.as_secs_f64();
    let par = par.as_secs_f64();
    Some((seq - par) / par * 100.0)
}

/// Run the benchmark with inputs built from `config`.
pub fn run<P>(config: &BenchConfig, parallel: &P) -> Result<BenchReport>
where
    P: ArraySum + ?Sized,
{
    let (a, b) = config.inputs();
    run_with_inputs(&a, &b, config.repetitions, parallel)
}

/// Run the benchmark on explicit inputs.
pub fn run_with_inputs<P>(a: &[i32], b: &[i32], repetitions: usize, parallel: &P) -> Result<BenchReport>
where
    P: ArraySum + ?Sized,
{
    let repetitions = repetitions.max(1);

    let mut seq_sample = TimingSample::new()?;
    let mut c_seq = Vec::new();
    for _ in 0..repetitions {
        c_seq = seq_sample.time(|| seq_sum(a, b));
    }

    let mut par_sample = TimingSample::new()?;
    let mut c_par = Vec::new();
    for _ in 0..repetitions {
        c_par = par_sample.time(|| parallel.sum(a, b))?;
    }

    let passed = equal(&c_seq, &c_par);
    let sequential = seq_sample.summary();
    let par_summary = par_sample.summary();

    let report = BenchReport {
        device: parallel.name().to_string(),
        array_len: a.len(),
        repetitions,
        first: match (a.first(), b.first(), c_par.first()) {
            (Some(&a0), Some(&b0), Some(&c0)) => Some((a0, b0, c0)),
            _ => None,
        },
        sequential,
        parallel: par_summary,
        speedup_percent: speedup_percent(sequential.mean, par_summary.mean),
        passed,
    };

    if passed {
        info!(
            len = report.array_len,
            seq_ms = sequential.mean_ms(),
            par_ms = par_summary.mean_ms(),
            "benchmark passed"
        );
    } else {
        warn!(len = report.array_len, device = %report.device, "parallel result differs from sequential");
    }

    Ok(report)
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "status: {}", if self.passed { "SUCCESS!" } else { "FAILED!" })?;
        writeln!(f, "device: {}", self.device)?;
        writeln!(
            f,
            "array length: {} ({} repetitions)",
            self.array_len, self.repetitions
        )?;
        if let Some((a0, b0, c0)) = self.first {
            writeln!(f, "results:")?;
            writeln!(f, "\ta[0] = {}", a0)?;
            writeln!(f, "\tb[0] = {}", b0)?;
            writeln!(f, "\tc[0] = a[0] + b[0] = {}", c0)?;
        }
        writeln!(f, "mean execution time:")?;
        writeln!(f, "\tsequential: {:.4} ms;", self.sequential.mean_ms())?;
        writeln!(f, "\tparallel: {:.4} ms.", self.parallel.mean_ms())?;
        match self.speedup_percent {
            Some(gain) => write!(f, "performance gain: {:.2}%", gain),
            None => write!(f, "performance gain: n/a (parallel time too small to measure)"),
        }
    }
}

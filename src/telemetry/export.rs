//! Report export.

use crate::benchmark::BenchReport;
use crate::error::Result;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Trait for writing benchmark reports somewhere.
pub trait ReportExporter {
    fn export(&self, report: &BenchReport) -> Result<()>;
}

/// Writes reports as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_path: PathBuf,
}

impl JsonExporter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }
}

impl ReportExporter for JsonExporter {
    fn export(&self, report: &BenchReport) -> Result<()> {
        let json = serde_json::to_string_pretty(&SerializableReport::from(report))?;
        std::fs::write(&self.output_path, json)?;
        debug!(path = %self.output_path.display(), "report exported");
        Ok(())
    }
}

/// Serializable view of a [`BenchReport`], times in milliseconds.
#[derive(Debug, Clone, Serialize)]
struct SerializableReport {
    device: String,
    array_len: usize,
    repetitions: usize,
    passed: bool,
    sequential_mean_ms: f64,
    sequential_p50_ms: f64,
    sequential_p99_ms: f64,
    sequential_max_ms: f64,
    parallel_mean_ms: f64,
    parallel_p50_ms: f64,
    parallel_p99_ms: f64,
    parallel_max_ms: f64,
    speedup_percent: Option<f64>,
    first_a: Option<i32>,
    first_b: Option<i32>,
    first_c: Option<i32>,
}

impl From<&BenchReport> for SerializableReport {
    fn from(report: &BenchReport) -> Self {
        let ms = |d: std::time::Duration| d.as_secs_f64() * 1e3;

        Self {
            device: report.device.clone(),
            array_len: report.array_len,
            repetitions: report.repetitions,
            passed: report.passed,
            sequential_mean_ms: ms(report.sequential.mean),
            sequential_p50_ms: ms(report.sequential.p50),
            sequential_p99_ms: ms(report.sequential.p99),
            sequential_max_ms: ms(report.sequential.max),
            parallel_mean_ms: ms(report.parallel.mean),
            parallel_p50_ms: ms(report.parallel.p50),
            parallel_p99_ms: ms(report.parallel.p99),
            parallel_max_ms: ms(report.parallel.max),
            speedup_percent: report.speedup_percent,
            first_a: report.first.map(|(a, _, _)| a),
            first_b: report.first.map(|(_, b, _)| b),
            first_c: report.first.map(|(_, _, c)| c),
        }
    }
}

//! Timing collection and report export.

pub mod export;
pub mod timing;

pub use export::{JsonExporter, ReportExporter};
pub use timing::{TimingSample, TimingSummary};

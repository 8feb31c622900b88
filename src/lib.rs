//! hetero-bench - heterogeneous compute demos on top of wgpu
//!
//! Three small programs share this library: a device capability report, a
//! greeting kernel round trip, and a benchmark that adds two integer arrays
//! once on the host and once on the selected device, then checks that both
//! results agree.
//!
//! # Quick Start
//!
//! ```no_run
//! use hetero_bench::prelude::*;
//!
//! let config = Config::builder().array_len(1 << 20).build()?;
//! let ctx = GpuContext::new(&config)?;
//! let adder = GpuArraySum::new(&ctx, &KernelSource::sum_arrays())?;
//!
//! let report = benchmark::run(&config.bench, &adder)?;
//! println!("{}", report);
//! # Ok::<(), hetero_bench::Error>(())
//! ```
//!
//! # Pieces
//!
//! - **Device selection**: first platform, first device by default; pluggable
//!   through [`device::SelectionStrategy`]
//! - **Kernel compilation**: WGSL source in, compiled pipeline or build log out
//! - **Explicit context**: [`gpu::GpuContext`] is created once and passed to
//!   every operation
//! - **Telemetry**: per-repetition timing histograms and JSON export

// Lint configuration
#![warn(missing_debug_implementations)]

pub mod benchmark;
pub mod config;
pub mod device;
pub mod error;
pub mod gpu;
pub mod hello;
pub mod prelude;
pub mod sum;
pub mod telemetry;

// Re-export key types at crate root
pub use config::{BenchConfig, Config, ConfigBuilder};
pub use device::{select_device, DeviceInfo, SelectionPolicy};
pub use error::{Error, Result};
pub use gpu::{GpuContext, KernelSource};
pub use sum::{equal, seq_sum, ArraySum, GpuArraySum};

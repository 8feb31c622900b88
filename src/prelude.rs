pub use crate::benchmark::{self, BenchReport};
pub use crate::config::{BenchConfig, Config, ConfigBuilder};
pub use crate::device::{
    select_device, DeviceInfo, DeviceKind, PlatformSource, SelectionPolicy, SelectionStrategy,
};
pub use crate::error::{Error, Result};
pub use crate::gpu::{GpuContext, KernelSource};
pub use crate::hello::run_hello;
pub use crate::sum::{equal, seq_sum, ArraySum, GpuArraySum};
pub use crate::telemetry::{JsonExporter, ReportExporter};

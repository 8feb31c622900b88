//! GPU runtime pieces: context, kernels and buffers.

pub mod buffer;
pub mod context;
pub mod kernel;

pub use buffer::GpuBuffer;
pub use context::GpuContext;
pub use kernel::{CompiledKernel, KernelSource};

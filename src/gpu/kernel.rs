//! Kernel sources and compilation.

use super::context::GpuContext;
use crate::error::{Error, Result};
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info};

/// WGSL for the elementwise array sum.
pub const SUM_ARRAYS_WGSL: &str = include_str!("../../kernels/sum_arrays.wgsl");

/// Invocations per work-group of the built-in sum kernel. Must match both
/// `WORKGROUP_SIZE` and `@workgroup_size` in `kernels/sum_arrays.wgsl`.
pub const SUM_WORKGROUP_SIZE: u32 = 256;

/// WGSL for the greeting kernel.
pub const HELLO_WGSL: &str = include_str!("../../kernels/hello.wgsl");

/// Source text of a unit-of-work definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelSource {
    pub label: String,
    pub text: String,
    pub entry_point: String,
    /// Invocations per work-group declared by the entry point
    pub workgroup_size: u32,
}

impl KernelSource {
    /// Wrap WGSL `text` whose `entry_point` declares `workgroup_size`
    /// invocations per work-group.
    pub fn new<L, T, E>(label: L, text: T, entry_point: E, workgroup_size: u32) -> Self
    where
        L: Into<String>,
        T: Into<String>,
        E: Into<String>,
    {
        Self {
            label: label.into(),
            text: text.into(),
            entry_point: entry_point.into(),
            workgroup_size,
        }
    }

    /// Built-in `c = a + b` kernel.
    pub fn sum_arrays() -> Self {
        Self::new("sum_arrays", SUM_ARRAYS_WGSL, "sum_arrays", SUM_WORKGROUP_SIZE)
    }

    /// Built-in greeting kernel.
    pub fn hello() -> Self {
        Self::new("hello", HELLO_WGSL, "hello", 1)
    }

    /// Read WGSL source from `path`.
    pub fn from_file<P, E>(path: P, entry_point: E, workgroup_size: u32) -> Result<Self>
    where
        P: AsRef<Path>,
        E: Into<String>,
    {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "kernel".to_string());

        debug!(path = %path.display(), bytes = text.len(), "loaded kernel source");
        Ok(Self::new(label, text, entry_point, workgroup_size))
    }

    /// Load from `path` when given, otherwise fall back to `default`.
    ///
    /// A loaded file keeps the entry point and work-group size of `default`;
    /// use [`KernelSource::with_workgroup_size`] when it declares another size.
    pub fn from_file_or(path: Option<&Path>, default: Self) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path, default.entry_point, default.workgroup_size),
            None => Ok(default),
        }
    }

    /// Replace the declared work-group size used to size dispatches.
    pub fn with_workgroup_size(mut self, workgroup_size: u32) -> Self {
        self.workgroup_size = workgroup_size;
        self
    }

    /// Compile for the context's device.
    ///
    /// Any diagnostic the platform raises while building the shader module or
    /// the pipeline is returned as [`Error::Build`] carrying the full log.
    pub fn compile(&self, ctx: &GpuContext) -> Result<CompiledKernel> {
        let device = ctx.device();

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.label.as_str()),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(self.text.as_str())),
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(self.label.as_str()),
            layout: None,
            module: &module,
            entry_point: self.entry_point.as_str(),
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            let log = err.to_string();
            return Err(Error::build(if log.is_empty() {
                format!("{}: unknown build failure", self.label)
            } else {
                log
            }));
        }

        let bind_group_layout = pipeline.get_bind_group_layout(0);
        info!(kernel = %self.label, entry = %self.entry_point, "kernel compiled");

        Ok(CompiledKernel {
            pipeline,
            bind_group_layout,
            workgroup_size: self.workgroup_size,
        })
    }
}

/// Compiled kernel ready for dispatch.
#[derive(Debug)]
pub struct CompiledKernel {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    workgroup_size: u32,
}

impl CompiledKernel {
    /// Compute pipeline for the entry point.
    pub fn pipeline(&self) -> &wgpu::ComputePipeline {
        &self.pipeline
    }

    /// Layout of bind group 0.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Invocations per work-group, as declared by the source.
    pub fn workgroup_size(&self) -> u32 {
        self.workgroup_size
    }
}

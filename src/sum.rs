//! Elementwise array addition on the host and on the device.

use crate::error::{Error, Result};
use crate::gpu::{CompiledKernel, GpuBuffer, GpuContext, KernelSource};
use std::mem;
use tracing::debug;

/// `c[i] = a[i] + b[i]` on the calling thread.
///
/// Addition wraps on overflow, matching 32-bit integer addition on the
/// device. `a` and `b` must have the same length.
pub fn seq_sum(a: &[i32], b: &[i32]) -> Vec<i32> {
    debug_assert_eq!(a.len(), b.len(), "seq_sum inputs differ in length");
    a.iter().zip(b).map(|(x, y)| x.wrapping_add(*y)).collect()
}

/// True iff both slices have the same length and equal elements.
/// Stops at the first mismatch.
pub fn equal(c1: &[i32], c2: &[i32]) -> bool {
    if c1.len() != c2.len() {
        return false;
    }
    c1.iter().zip(c2).all(|(x, y)| x == y)
}

/// Something that can add two arrays elementwise.
pub trait ArraySum {
    /// Name used in reports
    fn name(&self) -> &str;

    /// Compute `c[i] = a[i] + b[i]`.
    fn sum(&self, a: &[i32], b: &[i32]) -> Result<Vec<i32>>;
}

/// Work-group grid `(x, y)` covering `len` invocations.
///
/// Groups fill the x dimension up to `max_per_dim` and spill into further
/// rows; the kernel discards invocations past `len`.
pub fn dispatch_grid(len: usize, workgroup_size: u32, max_per_dim: u32) -> Result<(u32, u32)> {
    if workgroup_size == 0 || max_per_dim == 0 {
        return Err(Error::dispatch("work-group size and limit must be non-zero"));
    }

    let groups = (len as u64).div_ceil(workgroup_size as u64);
    if groups == 0 {
        return Ok((0, 0));
    }

    let x = groups.min(max_per_dim as u64);
    let y = groups.div_ceil(x);
    if y > max_per_dim as u64 {
        return Err(Error::dispatch(format!(
            "{} elements exceed the device dispatch grid",
            len
        )));
    }

    Ok((x as u32, y as u32))
}

/// Parallel array sum on a GPU: one invocation per element.
#[derive(Debug)]
pub struct GpuArraySum<'ctx> {
    ctx: &'ctx GpuContext,
    kernel: CompiledKernel,
}

impl<'ctx> GpuArraySum<'ctx> {
    /// Compile `source` for the context's device.
    pub fn new(ctx: &'ctx GpuContext, source: &KernelSource) -> Result<Self> {
        let kernel = source.compile(ctx)?;
        Ok(Self { ctx, kernel })
    }

    /// Compute `c = a + b` on the device.
    ///
    /// Every call uploads both inputs into fresh device buffers, dispatches
    /// one invocation per element, waits for completion and reads the output
    /// back. Nothing is cached between calls.
    pub fn par_sum(&self, a: &[i32], b: &[i32]) -> Result<Vec<i32>> {
        debug_assert_eq!(a.len(), b.len(), "par_sum inputs differ in length");
        let len = a.len().min(b.len());
        if len == 0 {
            return Ok(Vec::new());
        }

        let limits = self.ctx.limits();
        let bytes = (len * mem::size_of::<i32>()) as u64;
        if bytes > limits.max_storage_buffer_binding_size as u64 {
            return Err(Error::dispatch(format!(
                "{} bytes exceed the device storage binding limit of {}",
                bytes, limits.max_storage_buffer_binding_size
            )));
        }

        let (x, y) = dispatch_grid(
            len,
            self.kernel.workgroup_size(),
            limits.max_compute_workgroups_per_dimension,
        )?;
        debug!(len, groups_x = x, groups_y = y, "dispatching sum");

        self.ctx.dispatch_scope(|device| {
            let a_buf = GpuBuffer::input(self.ctx, "sum-a", &a[..len]);
            let b_buf = GpuBuffer::input(self.ctx, "sum-b", &b[..len]);
            let c_buf = GpuBuffer::output::<i32>(self.ctx, "sum-c", len);

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("sum-bind-group"),
                layout: self.kernel.bind_group_layout(),
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: a_buf.binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: b_buf.binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: c_buf.binding(),
                    },
                ],
            });

            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sum-encoder"),
            });

            {
                let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("sum-pass"),
                    timestamp_writes: None,
                });
                pass.set_pipeline(self.kernel.pipeline());
                pass.set_bind_group(0, &bind_group, &[]);
                pass.dispatch_workgroups(x, y, 1);
            }

            self.ctx.queue().submit(Some(encoder.finish()));

            c_buf.read_back::<i32>(self.ctx)
        })
    }
}

impl ArraySum for GpuArraySum<'_> {
    fn name(&self) -> &str {
        &self.ctx.info().name
    }

    fn sum(&self, a: &[i32], b: &[i32]) -> Result<Vec<i32>> {
        self.par_sum(a, b)
    }
}

//! Device-owned storage buffers and host read-back.

use super::context::GpuContext;
use crate::error::{Error, Result};
use bytemuck::Pod;
use std::mem;
use wgpu::util::DeviceExt;

/// A storage buffer on the device.
#[derive(Debug)]
pub struct GpuBuffer {
    buffer: wgpu::Buffer,
    /// Bytes
    size: u64,
}

impl GpuBuffer {
    /// Copy `data` into a new read-only storage buffer.
    pub fn input<T: Pod>(ctx: &GpuContext, label: &str, data: &[T]) -> Self {
        let buffer = ctx
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::STORAGE,
            });

        Self {
            buffer,
            size: mem::size_of_val(data) as u64,
        }
    }

    /// Allocate an uninitialised storage buffer for `len` elements of `T`
    /// that kernels write and the host reads back.
    pub fn output<T: Pod>(ctx: &GpuContext, label: &str, len: usize) -> Self {
        let size = (len * mem::size_of::<T>()) as u64;
        let buffer = ctx.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        Self { buffer, size }
    }

    /// Copy the buffer into host memory, blocking until the device is done.
    pub fn read_back<T: Pod>(&self, ctx: &GpuContext) -> Result<Vec<T>> {
        let device = ctx.device();

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("hetero-bench-staging"),
            size: self.size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("hetero-bench-readback"),
        });
        encoder.copy_buffer_to_buffer(&self.buffer, 0, &staging, 0, self.size);
        ctx.queue().submit(Some(encoder.finish()));

        let slice = staging.slice(..);
        let (sender, receiver) = crossbeam_channel::bounded(1);
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        device.poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .map_err(|_| Error::dispatch("buffer map callback was dropped"))?
            .map_err(|e| Error::dispatch(format!("failed to map buffer: {:?}", e)))?;

        let data = slice.get_mapped_range();
        let values = bytemuck::cast_slice::<u8, T>(&data).to_vec();
        drop(data);
        staging.unmap();

        Ok(values)
    }

    /// Bind the whole buffer.
    pub fn binding(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }
}

//! Compute context: the opened device and its queue.

use crate::config::Config;
use crate::device::{select_device, DeviceInfo, SelectedDevice, SelectionStrategy, WgpuPlatforms};
use crate::error::{Error, Result};
use tracing::{error, info};

/// Everything a kernel needs to run on the selected device.
///
/// Built once and passed explicitly to every operation that touches the
/// device.
#[derive(Debug)]
pub struct GpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
    limits: wgpu::Limits,
    info: DeviceInfo,
}

impl GpuContext {
    /// Select a device according to `config` and open it.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let platforms = WgpuPlatforms::new(config.backends);
        Self::with_strategy(&platforms, &config.selection)
    }

    /// Select a device from `platforms` with a custom strategy and open it.
    pub fn with_strategy<T>(platforms: &WgpuPlatforms, strategy: &T) -> Result<Self>
    where
        T: SelectionStrategy + ?Sized,
    {
        let selected = select_device(platforms, strategy)?;
        Self::open(selected)
    }

    /// Open an already selected adapter.
    pub fn open(selected: SelectedDevice<wgpu::Adapter>) -> Result<Self> {
        let SelectedDevice {
            device: adapter,
            info: device_info,
        } = selected;

        // Ask for everything the adapter offers so large arrays fit in one binding.
        let limits = adapter.limits();

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("hetero-bench-device"),
                required_features: wgpu::Features::empty(),
                required_limits: limits.clone(),
            },
            None,
        ))
        .map_err(|e| Error::device_init(e.to_string()))?;

        device.on_uncaptured_error(Box::new(|err: wgpu::Error| {
            error!(error = %err, "uncaptured device error");
        }));

        info!(
            device = %device_info.name,
            max_binding = limits.max_storage_buffer_binding_size,
            "device opened"
        );

        Ok(Self {
            device,
            queue,
            limits,
            info: device_info,
        })
    }

    /// Run `f` inside validation and out-of-memory error scopes.
    ///
    /// Errors the platform raises while `f` runs take precedence over `f`'s own
    /// result and are reported as [`Error::Dispatch`].
    pub fn dispatch_scope<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&wgpu::Device) -> Result<R>,
    {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let result = f(&self.device);

        let validation = pollster::block_on(self.device.pop_error_scope());
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());

        if let Some(err) = validation.or(out_of_memory) {
            return Err(Error::dispatch(err.to_string()));
        }

        result
    }

    /// The opened logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Submission queue of the device.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Limits the device was opened with (the adapter's own).
    pub fn limits(&self) -> &wgpu::Limits {
        &self.limits
    }

    /// Description of the selected device.
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }
}

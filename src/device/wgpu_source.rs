//! Platform enumeration backed by wgpu.

use super::{DeviceInfo, PlatformSource};

/// Platforms in the order they are offered.
const PLATFORM_ORDER: [(wgpu::Backend, wgpu::Backends); 4] = [
    (wgpu::Backend::Vulkan, wgpu::Backends::VULKAN),
    (wgpu::Backend::Metal, wgpu::Backends::METAL),
    (wgpu::Backend::Dx12, wgpu::Backends::DX12),
    (wgpu::Backend::Gl, wgpu::Backends::GL),
];

fn backend_bits(backend: wgpu::Backend) -> wgpu::Backends {
    PLATFORM_ORDER
        .iter()
        .find(|(b, _)| *b == backend)
        .map(|(_, bits)| *bits)
        .unwrap_or(wgpu::Backends::empty())
}

/// wgpu backends as platforms, adapters as devices.
///
/// A backend counts as a platform only when its driver reports at least one
/// adapter, mirroring an installed but unusable driver being invisible.
#[derive(Debug)]
pub struct WgpuPlatforms {
    instance: wgpu::Instance,
    backends: wgpu::Backends,
}

impl WgpuPlatforms {
    /// Create an instance restricted to `backends`.
    pub fn new(backends: wgpu::Backends) -> Self {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        Self { instance, backends }
    }
}

impl PlatformSource for WgpuPlatforms {
    type Platform = wgpu::Backend;
    type Device = wgpu::Adapter;

    fn platforms(&self) -> Vec<wgpu::Backend> {
        PLATFORM_ORDER
            .iter()
            .filter(|(_, bits)| self.backends.contains(*bits))
            .filter(|(_, bits)| {
                self.instance
                    .enumerate_adapters(*bits)
                    .into_iter()
                    .next()
                    .is_some()
            })
            .map(|(backend, _)| *backend)
            .collect()
    }

    fn platform_name(&self, platform: &wgpu::Backend) -> String {
        format!("{:?}", platform)
    }

    fn devices(&self, platform: &wgpu::Backend) -> Vec<wgpu::Adapter> {
        let bits = backend_bits(*platform);
        if bits.is_empty() {
            return Vec::new();
        }
        self.instance.enumerate_adapters(bits).into_iter().collect()
    }

    fn describe(&self, device: &wgpu::Adapter) -> DeviceInfo {
        DeviceInfo::from_adapter(device)
    }
}

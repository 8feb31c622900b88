//! Device discovery and selection.
//!
//! A *platform* groups devices that share a driver stack; with wgpu this is a
//! backend (Vulkan, Metal, DX12, GL) and each adapter is a device.

pub mod info;
pub mod selector;
pub mod wgpu_source;

pub use info::{vendor_name, DeviceInfo, DeviceKind};
pub use selector::{select_device, SelectedDevice, SelectionPolicy, SelectionStrategy};
pub use wgpu_source::WgpuPlatforms;

/// Capability-query service: enumerates platforms and their devices.
pub trait PlatformSource {
    /// Platform handle
    type Platform;
    /// Device handle
    type Device;

    /// All available platforms, in a stable order.
    fn platforms(&self) -> Vec<Self::Platform>;

    /// Display name of a platform.
    fn platform_name(&self, platform: &Self::Platform) -> String;

    /// All devices of a platform, in a stable order.
    fn devices(&self, platform: &Self::Platform) -> Vec<Self::Device>;

    /// Query the capabilities of a device.
    fn describe(&self, device: &Self::Device) -> DeviceInfo;
}

//! Device capability descriptions.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Coarse classification of a compute device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    /// Dedicated GPU
    Discrete,
    /// GPU sharing memory with the host
    Integrated,
    /// Virtualised GPU
    Virtual,
    /// Software rasterizer or other CPU device
    Cpu,
    #[default]
    Other,
}

impl From<wgpu::DeviceType> for DeviceKind {
    fn from(ty: wgpu::DeviceType) -> Self {
        match ty {
            wgpu::DeviceType::DiscreteGpu => Self::Discrete,
            wgpu::DeviceType::IntegratedGpu => Self::Integrated,
            wgpu::DeviceType::VirtualGpu => Self::Virtual,
            wgpu::DeviceType::Cpu => Self::Cpu,
            wgpu::DeviceType::Other => Self::Other,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discrete => write!(f, "discrete GPU"),
            Self::Integrated => write!(f, "integrated GPU"),
            Self::Virtual => write!(f, "virtual GPU"),
            Self::Cpu => write!(f, "CPU"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "discrete" => Ok(Self::Discrete),
            "integrated" => Ok(Self::Integrated),
            "virtual" => Ok(Self::Virtual),
            "cpu" => Ok(Self::Cpu),
            "other" => Ok(Self::Other),
            other => Err(Error::config(format!("unknown device kind `{}`", other))),
        }
    }
}

/// Human readable vendor for a PCI (or Khronos) vendor id.
pub fn vendor_name(id: u32) -> String {
    let name = match id {
        0x1002 => "AMD",
        0x1010 => "Imagination Technologies",
        0x106B => "Apple",
        0x10DE => "NVIDIA",
        0x13B5 => "ARM",
        0x1414 => "Microsoft",
        0x5143 => "Qualcomm",
        0x8086 => "Intel",
        0x10005 => "Mesa",
        _ => return format!("unknown (0x{:04x})", id),
    };
    name.to_string()
}

/// Capabilities of one device, as reported by its platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub name: String,
    pub vendor: String,
    pub vendor_id: u32,
    /// Driver name and version string
    pub version: String,
    /// Name of the platform (backend) the device belongs to
    pub platform: String,
    pub kind: DeviceKind,
    /// Max work-item extents per dimension `(x, y, z)`
    pub max_work_item_sizes: [u32; 3],
    /// Max invocations in a single work-group
    pub max_work_group_size: u32,
    pub max_work_groups_per_dimension: u32,
    /// Not every platform reports this
    pub compute_units: Option<u32>,
    pub max_buffer_size: u64,
    pub max_storage_binding_size: u32,
    /// Work-group shared memory
    pub local_memory_size: u32,
}

impl DeviceInfo {
    /// Describe a wgpu adapter.
    pub fn from_adapter(adapter: &wgpu::Adapter) -> Self {
        let info = adapter.get_info();
        let limits = adapter.limits();

        let version = match (info.driver.is_empty(), info.driver_info.is_empty()) {
            (true, true) => "unknown".to_string(),
            (false, true) => info.driver.clone(),
            (true, false) => info.driver_info.clone(),
            (false, false) => format!("{} {}", info.driver, info.driver_info),
        };

        Self {
            name: info.name.clone(),
            vendor: vendor_name(info.vendor),
            vendor_id: info.vendor,
            version,
            platform: format!("{:?}", info.backend),
            kind: info.device_type.into(),
            max_work_item_sizes: [
                limits.max_compute_workgroup_size_x,
                limits.max_compute_workgroup_size_y,
                limits.max_compute_workgroup_size_z,
            ],
            max_work_group_size: limits.max_compute_invocations_per_workgroup,
            max_work_groups_per_dimension: limits.max_compute_workgroups_per_dimension,
            compute_units: None,
            max_buffer_size: limits.max_buffer_size,
            max_storage_binding_size: limits.max_storage_buffer_binding_size,
            local_memory_size: limits.max_compute_workgroup_storage_size,
        }
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.max_work_item_sizes;
        writeln!(f, "device info:")?;
        writeln!(f, " name: {}", self.name)?;
        writeln!(f, " vendor: {}", self.vendor)?;
        writeln!(f, " version: {}", self.version)?;
        writeln!(f, " platform: {}", self.platform)?;
        writeln!(f, " type: {}", self.kind)?;
        writeln!(f, " max size of work-items: ({},{},{})", x, y, z)?;
        writeln!(f, " max size of work-groups: {}", self.max_work_group_size)?;
        writeln!(
            f,
            " max work-groups per dimension: {}",
            self.max_work_groups_per_dimension
        )?;
        match self.compute_units {
            Some(units) => writeln!(f, " number of compute units: {}", units)?,
            None => writeln!(f, " number of compute units: unknown")?,
        }
        writeln!(f, " max buffer size (bytes): {}", self.max_buffer_size)?;
        writeln!(
            f,
            " max storage binding size (bytes): {}",
            self.max_storage_binding_size
        )?;
        write!(
            f,
            " local memory size per work-group (bytes): {}",
            self.local_memory_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_names() {
        assert_eq!(vendor_name(0x10DE), "NVIDIA");
        assert_eq!(vendor_name(0x8086), "Intel");
        assert_eq!(vendor_name(0xBEEF), "unknown (0xbeef)");
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("discrete".parse::<DeviceKind>().unwrap(), DeviceKind::Discrete);
        assert_eq!("CPU".parse::<DeviceKind>().unwrap(), DeviceKind::Cpu);
        assert!("quantum".parse::<DeviceKind>().is_err());
    }

    #[test]
    fn test_kind_from_wgpu() {
        assert_eq!(
            DeviceKind::from(wgpu::DeviceType::IntegratedGpu),
            DeviceKind::Integrated
        );
        assert_eq!(DeviceKind::from(wgpu::DeviceType::Cpu), DeviceKind::Cpu);
    }

    #[test]
    fn test_report_lists_capabilities() {
        let info = DeviceInfo {
            name: "Test GPU".into(),
            vendor: "ACME".into(),
            max_work_item_sizes: [256, 256, 64],
            max_work_group_size: 256,
            compute_units: Some(8),
            local_memory_size: 16384,
            ..DeviceInfo::default()
        };
        let report = info.to_string();

        assert!(report.contains("name: Test GPU"));
        assert!(report.contains("vendor: ACME"));
        assert!(report.contains("max size of work-items: (256,256,64)"));
        assert!(report.contains("number of compute units: 8"));
        assert!(report.contains("(bytes): 16384"));
    }

    #[test]
    fn test_json_fields() {
        let info = DeviceInfo {
            name: "Test GPU".into(),
            kind: DeviceKind::Discrete,
            ..DeviceInfo::default()
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["name"], "Test GPU");
        assert_eq!(value["kind"], "discrete");
        assert!(value["compute_units"].is_null());
    }

    #[test]
    fn test_report_unknown_compute_units() {
        let report = DeviceInfo::default().to_string();
        assert!(report.contains("number of compute units: unknown"));
    }
}

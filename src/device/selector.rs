//! Platform and device selection.
//!
//! Selection always looks at the first platform only and, by default, takes
//! the first device found there. Other policies pick among the devices of that
//! same platform.

use super::info::{DeviceInfo, DeviceKind};
use super::PlatformSource;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Chooses one device among the candidates of a platform.
pub trait SelectionStrategy {
    /// Return the index of the chosen candidate. `candidates` is never empty.
    fn choose(&self, candidates: &[DeviceInfo]) -> Result<usize>;
}

/// Built-in selection policies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// First device of the first platform
    #[default]
    FirstFound,
    /// First device of the given kind, falling back to the first device
    PreferKind(DeviceKind),
    /// First device whose name contains the substring (case-insensitive)
    NameContains(String),
}

impl SelectionStrategy for SelectionPolicy {
    fn choose(&self, candidates: &[DeviceInfo]) -> Result<usize> {
        match self {
            Self::FirstFound => Ok(0),
            Self::PreferKind(kind) => Ok(candidates
                .iter()
                .position(|d| d.kind == *kind)
                .unwrap_or(0)),
            Self::NameContains(needle) => {
                let needle = needle.to_lowercase();
                candidates
                    .iter()
                    .position(|d| d.name.to_lowercase().contains(&needle))
                    .ok_or_else(|| Error::NoMatchingDevice(self.to_string()))
            }
        }
    }
}

/// Predicates select the first matching device.
impl<F> SelectionStrategy for F
where
    F: Fn(&DeviceInfo) -> bool,
{
    fn choose(&self, candidates: &[DeviceInfo]) -> Result<usize> {
        candidates
            .iter()
            .position(|d| self(d))
            .ok_or_else(|| Error::NoMatchingDevice("predicate".to_string()))
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstFound => write!(f, "first"),
            Self::PreferKind(DeviceKind::Discrete) => write!(f, "discrete"),
            Self::PreferKind(DeviceKind::Integrated) => write!(f, "integrated"),
            Self::PreferKind(DeviceKind::Virtual) => write!(f, "virtual"),
            Self::PreferKind(DeviceKind::Cpu) => write!(f, "cpu"),
            Self::PreferKind(DeviceKind::Other) => write!(f, "other"),
            Self::NameContains(needle) => write!(f, "name:{}", needle),
        }
    }
}

impl FromStr for SelectionPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(needle) = s.strip_prefix("name:") {
            if needle.is_empty() {
                return Err(Error::config("`name:` policy needs a substring"));
            }
            return Ok(Self::NameContains(needle.to_string()));
        }

        match s {
            "first" => Ok(Self::FirstFound),
            kind => kind.parse().map(Self::PreferKind),
        }
    }
}

/// A device chosen by [`select_device`], with its description.
#[derive(Debug)]
pub struct SelectedDevice<D> {
    pub device: D,
    pub info: DeviceInfo,
}

/// Pick a device from the first platform of `source`.
pub fn select_device<S, T>(source: &S, strategy: &T) -> Result<SelectedDevice<S::Device>>
where
    S: PlatformSource + ?Sized,
    T: SelectionStrategy + ?Sized,
{
    let platforms = source.platforms();
    debug!(count = platforms.len(), "enumerated platforms");

    let platform = platforms.into_iter().next().ok_or(Error::NoPlatformAvailable)?;
    let platform_name = source.platform_name(&platform);

    let devices = source.devices(&platform);
    debug!(platform = %platform_name, count = devices.len(), "enumerated devices");
    if devices.is_empty() {
        return Err(Error::NoDeviceAvailable);
    }

    let infos: Vec<DeviceInfo> = devices.iter().map(|d| source.describe(d)).collect();
    let index = strategy.choose(&infos)?;

    let info = infos
        .into_iter()
        .nth(index)
        .ok_or_else(|| Error::NoMatchingDevice(format!("index {} out of range", index)))?;
    let device = devices
        .into_iter()
        .nth(index)
        .ok_or_else(|| Error::NoMatchingDevice(format!("index {} out of range", index)))?;

    info!(device = %info.name, platform = %platform_name, kind = %info.kind, "selected device");

    Ok(SelectedDevice { device, info })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakePlatforms {
        platforms: Vec<(&'static str, Vec<DeviceInfo>)>,
    }

    impl PlatformSource for FakePlatforms {
        type Platform = usize;
        type Device = DeviceInfo;

        fn platforms(&self) -> Vec<usize> {
            (0..self.platforms.len()).collect()
        }

        fn platform_name(&self, platform: &usize) -> String {
            self.platforms[*platform].0.to_string()
        }

        fn devices(&self, platform: &usize) -> Vec<DeviceInfo> {
            self.platforms[*platform].1.clone()
        }

        fn describe(&self, device: &DeviceInfo) -> DeviceInfo {
            device.clone()
        }
    }

    fn device(name: &str, kind: DeviceKind) -> DeviceInfo {
        DeviceInfo {
            name: name.to_string(),
            kind,
            ..DeviceInfo::default()
        }
    }

    fn two_platforms() -> FakePlatforms {
        FakePlatforms {
            platforms: vec![
                (
                    "Vulkan",
                    vec![
                        device("llvmpipe", DeviceKind::Cpu),
                        device("Radeon 780M", DeviceKind::Integrated),
                        device("GeForce RTX 4070", DeviceKind::Discrete),
                    ],
                ),
                ("Gl", vec![device("Mesa Intel", DeviceKind::Integrated)]),
            ],
        }
    }

    #[test]
    fn test_first_found() {
        let selected = select_device(&two_platforms(), &SelectionPolicy::FirstFound).unwrap();
        assert_eq!(selected.device.name, "llvmpipe");
        assert_eq!(selected.info.name, "llvmpipe");
    }

    #[test]
    fn test_no_platforms() {
        let source = FakePlatforms { platforms: vec![] };
        let err = select_device(&source, &SelectionPolicy::FirstFound).unwrap_err();
        assert!(matches!(err, Error::NoPlatformAvailable));
    }

    #[test]
    fn test_first_platform_without_devices() {
        // Later platforms are never consulted.
        let source = FakePlatforms {
            platforms: vec![
                ("Vulkan", vec![]),
                ("Gl", vec![device("Mesa Intel", DeviceKind::Integrated)]),
            ],
        };
        let err = select_device(&source, &SelectionPolicy::FirstFound).unwrap_err();
        assert!(matches!(err, Error::NoDeviceAvailable));
    }

    #[test]
    fn test_prefer_kind() {
        let policy = SelectionPolicy::PreferKind(DeviceKind::Discrete);
        let selected = select_device(&two_platforms(), &policy).unwrap();
        assert_eq!(selected.device.name, "GeForce RTX 4070");

        // Falls back to the first device when the kind is absent.
        let policy = SelectionPolicy::PreferKind(DeviceKind::Virtual);
        let selected = select_device(&two_platforms(), &policy).unwrap();
        assert_eq!(selected.device.name, "llvmpipe");
    }

    #[test]
    fn test_name_contains() {
        let policy = SelectionPolicy::NameContains("radeon".into());
        let selected = select_device(&two_platforms(), &policy).unwrap();
        assert_eq!(selected.device.name, "Radeon 780M");

        let policy = SelectionPolicy::NameContains("Mesa".into());
        let err = select_device(&two_platforms(), &policy).unwrap_err();
        assert!(matches!(err, Error::NoMatchingDevice(_)));
    }

    #[test]
    fn test_predicate_strategy() {
        let pick_gpu = |d: &DeviceInfo| d.kind != DeviceKind::Cpu;
        let selected = select_device(&two_platforms(), &pick_gpu).unwrap();
        assert_eq!(selected.device.name, "Radeon 780M");
    }

    #[test]
    fn test_out_of_range_strategy() {
        struct Last;
        impl SelectionStrategy for Last {
            fn choose(&self, candidates: &[DeviceInfo]) -> Result<usize> {
                Ok(candidates.len())
            }
        }

        let err = select_device(&two_platforms(), &Last).unwrap_err();
        assert!(matches!(err, Error::NoMatchingDevice(_)));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("first".parse::<SelectionPolicy>().unwrap(), SelectionPolicy::FirstFound);
        assert_eq!(
            "discrete".parse::<SelectionPolicy>().unwrap(),
            SelectionPolicy::PreferKind(DeviceKind::Discrete)
        );
        assert_eq!(
            "name:RTX".parse::<SelectionPolicy>().unwrap(),
            SelectionPolicy::NameContains("RTX".into())
        );
        assert!("name:".parse::<SelectionPolicy>().is_err());
        assert!("fastest".parse::<SelectionPolicy>().is_err());
    }

    #[test]
    fn test_policy_display_round_trips() {
        for text in ["first", "cpu", "integrated", "name:Arc"] {
            let policy: SelectionPolicy = text.parse().unwrap();
            assert_eq!(policy.to_string(), text);
        }
    }
}

use crate::device::SelectionPolicy;
use crate::error::{Error, Result};
use crate::gpu::KernelSource;
use std::path::PathBuf;

/// Largest array the benchmark accepts (elements).
pub const MAX_ARRAY_LEN: usize = 1 << 28;

/// Benchmark sizing and input fill values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub array_len: usize,
    pub repetitions: usize,
    pub fill_a: i32,
    pub fill_b: i32,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            array_len: 1 << 20,
            repetitions: 10,
            fill_a: 3,
            fill_b: 5,
        }
    }
}

impl BenchConfig {
    /// Build the `(a, b)` input pair described by this config.
    pub fn inputs(&self) -> (Vec<i32>, Vec<i32>) {
        (
            vec![self.fill_a; self.array_len],
            vec![self.fill_b; self.array_len],
        )
    }
}

/// Run configuration shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backends searched for platforms
    pub backends: wgpu::Backends,
    pub selection: SelectionPolicy,
    pub bench: BenchConfig,
    /// WGSL file replacing the built-in sum kernel
    pub sum_kernel: Option<PathBuf>,
    /// Work-group size declared by `sum_kernel`, when it differs from the
    /// built-in one
    pub sum_workgroup_size: Option<u32>,
    pub hello_kernel: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backends: wgpu::util::backend_bits_from_env().unwrap_or(wgpu::Backends::all()),
            selection: SelectionPolicy::default(),
            bench: BenchConfig::default(),
            sum_kernel: None,
            sum_workgroup_size: None,
            hello_kernel: None,
        }
    }
}

impl Config {
    /// Create a new configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.backends.is_empty() {
            return Err(Error::config("at least one backend must be enabled"));
        }

        if self.bench.repetitions == 0 {
            return Err(Error::config("repetitions must be > 0"));
        }

        if self.bench.array_len > MAX_ARRAY_LEN {
            return Err(Error::config(format!(
                "array_len too large (max {})",
                MAX_ARRAY_LEN
            )));
        }

        match self.sum_workgroup_size {
            Some(0) => return Err(Error::config("workgroup size must be > 0")),
            Some(_) if self.sum_kernel.is_none() => {
                return Err(Error::config(
                    "workgroup size can only be set together with a sum kernel file",
                ));
            }
            _ => {}
        }

        Ok(())
    }

    /// Sum kernel to compile: the configured file or the built-in source.
    pub fn sum_source(&self) -> Result<KernelSource> {
        let source =
            KernelSource::from_file_or(self.sum_kernel.as_deref(), KernelSource::sum_arrays())?;
        Ok(match self.sum_workgroup_size {
            Some(size) => source.with_workgroup_size(size),
            None => source,
        })
    }

    /// Greeting kernel to compile: the configured file or the built-in source.
    pub fn hello_source(&self) -> Result<KernelSource> {
        KernelSource::from_file_or(self.hello_kernel.as_deref(), KernelSource::hello())
    }
}

/// Builder for [`Config`]
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from the defaults
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the backends searched for platforms
    pub fn backends(mut self, backends: wgpu::Backends) -> Self {
        self.config.backends = backends;
        self
    }

    /// Parse a comma separated backend list such as `"vulkan,gl"`.
    pub fn backends_from_list(mut self, list: &str) -> Self {
        self.config.backends = wgpu::util::parse_backends_from_comma_list(list);
        self
    }

    /// Set the device selection policy
    pub fn selection(mut self, policy: SelectionPolicy) -> Self {
        self.config.selection = policy;
        self
    }

    /// Set the number of elements per input array
    pub fn array_len(mut self, n: usize) -> Self {
        self.config.bench.array_len = n;
        self
    }

    /// Set how many times each path runs
    pub fn repetitions(mut self, n: usize) -> Self {
        self.config.bench.repetitions = n;
        self
    }

    /// Set the values every element of `a` and `b` is filled with
    pub fn fill_values(mut self, a: i32, b: i32) -> Self {
        self.config.bench.fill_a = a;
        self.config.bench.fill_b = b;
        self
    }

    /// Load the sum kernel from a WGSL file
    pub fn sum_kernel<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.sum_kernel = Some(path.into());
        self
    }

    /// Set the work-group size declared by the sum kernel file
    pub fn sum_workgroup_size(mut self, size: u32) -> Self {
        self.config.sum_workgroup_size = Some(size);
        self
    }

    /// Load the greeting kernel from a WGSL file
    pub fn hello_kernel<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.hello_kernel = Some(path.into());
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

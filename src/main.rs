//! Command line front end: `info`, `hello` and `add`.

use clap::{Parser, Subcommand};
use hetero_bench::device::WgpuPlatforms;
use hetero_bench::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hetero-bench", version, about = "Heterogeneous compute demos on wgpu")]
struct Cli {
    /// Comma separated backends: vulkan, metal, dx12, gl. Defaults to
    /// $WGPU_BACKEND, else all of them
    #[arg(long, global = true)]
    backends: Option<String>,

    /// Device selection: first, discrete, integrated, virtual, cpu or name:<substring>
    #[arg(long, global = true, default_value = "first")]
    policy: SelectionPolicy,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the capabilities of the selected device
    Info {
        /// Print as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Run the greeting kernel and print what it wrote
    Hello {
        /// WGSL file to use instead of the built-in kernel (entry point `hello`)
        #[arg(long)]
        kernel: Option<PathBuf>,
    },

    /// Add two arrays on the host and on the device, compare and time both
    Add {
        /// Number of elements
        #[arg(long, default_value_t = 1 << 20)]
        len: usize,

        /// Repetitions per path
        #[arg(long, default_value_t = 10)]
        reps: usize,

        /// Value every element of `a` is set to
        #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
        a: i32,

        /// Value every element of `b` is set to
        #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
        b: i32,

        /// WGSL file to use instead of the built-in kernel (entry point `sum_arrays`)
        #[arg(long)]
        kernel: Option<PathBuf>,

        /// Work-group size declared by `--kernel`, if not 256
        #[arg(long, requires = "kernel")]
        workgroup_size: Option<u32>,

        /// Also write the report as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

/// Filter used when `RUST_LOG` is unset. Only this crate logs by default;
/// wgpu's own diagnostics are let through at `-vv`.
fn default_filter(verbose: u8) -> String {
    match verbose {
        0 => "hetero_bench=warn".to_string(),
        1 => "hetero_bench=info".to_string(),
        _ => "hetero_bench=debug,wgpu_core=warn,wgpu_hal=warn,naga=warn".to_string(),
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut builder = Config::builder().selection(cli.policy);
    if let Some(list) = cli.backends.as_deref() {
        builder = builder.backends_from_list(list);
    }

    match cli.command {
        Command::Info { json } => {
            let config = builder.build()?;
            let platforms = WgpuPlatforms::new(config.backends);
            let selected = select_device(&platforms, &config.selection)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&selected.info)?);
            } else {
                println!("{}", selected.info);
            }
        }

        Command::Hello { kernel } => {
            if let Some(path) = kernel {
                builder = builder.hello_kernel(path);
            }
            let config = builder.build()?;

            let ctx = GpuContext::new(&config)?;
            let source = config.hello_source()?;
            print!("{}", run_hello(&ctx, &source)?);
        }

        Command::Add {
            len,
            reps,
            a,
            b,
            kernel,
            workgroup_size,
            json,
        } => {
            builder = builder.array_len(len).repetitions(reps).fill_values(a, b);
            if let Some(path) = kernel {
                builder = builder.sum_kernel(path);
            }
            if let Some(size) = workgroup_size {
                builder = builder.sum_workgroup_size(size);
            }
            let config = builder.build()?;

            let ctx = GpuContext::new(&config)?;
            let source = config.sum_source()?;
            let adder = GpuArraySum::new(&ctx, &source)?;

            let report = benchmark::run(&config.bench, &adder)?;
            println!("{}", report);

            if let Some(path) = json {
                JsonExporter::new(path).export(&report)?;
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

//! syscap: capture system state snapshots and diff them between phases.
//!
//! Captures a configured set of files and command outputs under a tag and
//! phase label, then shows what changed between two phases.

#![allow(clippy::struct_excessive_bools)]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use syscap::{
    cli,
    config::{
        generate_json_schema, init_config_file, load_or_builtin, resolve_storage_root,
        CaptureCommandConfig, DiffCommandConfig, OutputConfig, DEFAULT_TAG,
    },
    error::SyscapError,
    pipeline::exit_codes,
    reports::ReportFormat,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Config file written by `--init` when `--config` is not given
const DEFAULT_INIT_PATH: &str = "syscap.yaml";

#[derive(Parser)]
#[command(name = "syscap")]
#[command(version)]
#[command(about = "Capture system state snapshots and diff them between phases", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success (a diff with differences still succeeds)
    1  Changes detected with --fail-on-change
    2  Invalid arguments, tag/phase, base directory or config file
    3  Snapshot not found
    4  I/O error

EXAMPLES:
    # Capture the current state before an upgrade
    syscap -t upgrade -p pre

    # Capture again afterwards and compare
    syscap -t upgrade -p post
    syscap -t upgrade -p post -d pre

    # Capture an offline root filesystem
    syscap -b /mnt/sysroot -t image -p v1

    # Machine-readable diff, failing the job when anything changed
    syscap -t upgrade -p post -d pre --format json --fail-on-change")]
struct Cli {
    /// Base directory for configured file paths and command working directory
    #[arg(short, long, default_value = "/")]
    base: PathBuf,

    /// Snapshot tag grouping related phases
    #[arg(short, long, default_value = DEFAULT_TAG)]
    tag: String,

    /// Phase label to capture (the new side of a diff)
    #[arg(
        short,
        long,
        required_unless_present_any = ["init", "print_config", "config_schema"]
    )]
    phase: Option<String>,

    /// Compare --phase against this earlier phase instead of capturing
    #[arg(short, long, requires = "phase")]
    diff_against: Option<String>,

    /// Path to the capture list (YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Snapshot storage root (default ~/.syscap)
    #[arg(long, env = "SYSCAP_STORAGE_ROOT")]
    storage_root: Option<PathBuf>,

    /// Per-command timeout in seconds, overriding the config file
    #[arg(long)]
    timeout: Option<u64>,

    /// Diff report format
    #[arg(long, default_value = "text")]
    format: ReportFormat,

    /// Write the diff report to a file instead of stdout
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Exit with code 1 when the diff finds any change
    #[arg(long)]
    fail_on_change: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Write a commented default config to --config (or ./syscap.yaml)
    #[arg(short, long)]
    init: bool,

    /// Print the effective configuration as YAML
    #[arg(long)]
    print_config: bool,

    /// Print the JSON schema of the config file format
    #[arg(long)]
    config_schema: bool,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(cli) {
        Ok(exit_codes::SUCCESS) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(exit_code_for(&err));
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    if cli.config_schema {
        println!("{}", generate_json_schema()?);
        return Ok(exit_codes::SUCCESS);
    }

    if cli.init {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INIT_PATH));
        init_config_file(&path)?;
        tracing::info!("Wrote default configuration to {}", path.display());
        return Ok(exit_codes::SUCCESS);
    }

    let (mut capture, config_path) = load_or_builtin(cli.config.as_deref())?;
    if let Some(path) = &config_path {
        tracing::info!("Loaded configuration from {}", path.display());
    }
    if let Some(secs) = cli.timeout {
        capture.command_timeout_secs = secs;
    }
    let storage_root = resolve_storage_root(cli.storage_root.clone(), &capture);

    if cli.print_config {
        capture.storage_root = Some(storage_root);
        let yaml = serde_yaml::to_string(&capture).context("Failed to serialize configuration")?;
        print!("{yaml}");
        return Ok(exit_codes::SUCCESS);
    }

    let Some(phase) = cli.phase else {
        return Err(SyscapError::config("--phase is required").into());
    };

    match cli.diff_against {
        Some(old_phase) => cli::run_diff(DiffCommandConfig {
            tag: cli.tag,
            old_phase,
            new_phase: phase,
            storage_root,
            output: OutputConfig {
                format: cli.format,
                file: cli.output_file,
                no_color: cli.no_color,
            },
            fail_on_change: cli.fail_on_change,
        }),
        None => cli::run_capture(CaptureCommandConfig {
            base_dir: cli.base,
            tag: cli.tag,
            phase,
            storage_root,
            capture,
        }),
    }
}

/// Map an error onto the exit code table; unclassified failures are I/O.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<SyscapError>()
        .map_or(exit_codes::IO_ERROR, SyscapError::exit_code)
}

//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Partcast - index-driven multipart record streaming
#[derive(Parser, Debug)]
#[command(
    name = "partcast",
    author,
    version,
    about = "Index-driven multipart record streaming",
    long_about = "Streams records out of a bounded store in fixed-size multipart groups.\n\n\
                  Opens a record store from configuration, binds a transport, and \n\
                  dispatches one group per socket per cycle until the store drains."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "PARTCAST_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "PARTCAST_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the streaming pipeline
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "stream.toml", env = "PARTCAST_CONFIG")]
    pub config: PathBuf,

    /// Override records per group from configuration
    #[arg(long, env = "PARTCAST_GROUP_SIZE")]
    pub group_size: Option<usize>,

    /// Override cycle interval in milliseconds from configuration
    #[arg(long, env = "PARTCAST_INTERVAL_MS")]
    pub interval_ms: Option<u64>,

    /// Override maximum dispatch cycles (0 = until drained)
    #[arg(long, env = "PARTCAST_MAX_CYCLES")]
    pub max_cycles: Option<u64>,

    /// Validate configuration and exit without running the pipeline
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "PARTCAST_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "stream.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "stream.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Open the store and report the live record count
    #[arg(long)]
    pub probe: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

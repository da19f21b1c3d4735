//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Config file used when `--config` is not given; defaults apply if it is missing.
pub const DEFAULT_CONFIG: &str = "etc/restock.toml";

#[derive(Parser, Debug)]
#[command(name = "restock", version, about = "Low-stock alerts for a product on a serial scale")]
pub struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print results and logs as JSON instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG wins when set
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Weigh the product now on the scale and register it, replacing any previous one
    Register {
        /// Product name
        #[arg(long)]
        name: String,
        /// Alert once the weight drops below this percentage of the registered weight
        #[arg(long, value_name = "PCT", value_parser = clap::value_parser!(u8).range(0..=100))]
        threshold: u8,
    },
    /// Change the alert threshold of the registered product
    Threshold {
        /// New threshold percentage
        #[arg(long, value_name = "PCT", value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,
    },
    /// Forget the registered product
    Delete,
    /// Show current weight and alert state
    ///
    /// Every invocation starts with an empty sample cache, so a one-shot status
    /// always weighs; the stale window only throttles sampling inside `watch`.
    Status {
        /// Drop any cached sample and weigh now
        #[arg(long)]
        fresh: bool,
    },
    /// Print status repeatedly until interrupted
    Watch {
        /// Time between status lines
        #[arg(long, value_name = "MS", default_value_t = 1000)]
        interval_ms: u64,
        /// Stop after this many status lines
        #[arg(long, value_name = "N")]
        count: Option<u64>,
        /// Weigh for every line instead of reusing samples younger than the stale window
        #[arg(long)]
        fresh: bool,
    },
    /// Check that the scale is connected and answering
    SelfCheck,
}

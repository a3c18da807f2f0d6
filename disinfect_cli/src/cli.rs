//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "disinfect", version, about = "Disinfection unit simulator")]
pub struct Cli {
    /// Path to config TOML; factory defaults when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log and report as JSON lines instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); falls back to
    /// logging.level from the config, then "info"
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the state/action HTTP API with the monitor running
    Serve {
        /// Socket address to bind; overrides server.bind from the config
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
    /// Run one program to completion against an accelerated clock
    Simulate {
        /// Program id or name to run; the configured default when omitted
        #[arg(long, value_name = "PROGRAM")]
        program: Option<String>,
        /// Custom day count applied before starting
        #[arg(long, value_name = "DAYS")]
        custom_days: Option<i64>,
        /// Simulated seconds per real second
        #[arg(long, value_name = "FACTOR", default_value_t = 86_400.0)]
        speed: f64,
        /// Interval between progress reports, in real milliseconds
        #[arg(long, value_name = "MS", default_value_t = 250)]
        report_ms: u64,
        /// Drain the tank after this many simulated seconds
        #[arg(long, value_name = "SECS")]
        tank_fault_after_s: Option<u64>,
    },
    /// Validate the config and exercise the device model once
    SelfCheck,
}

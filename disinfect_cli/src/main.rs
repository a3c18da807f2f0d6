#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod cli;
mod error_fmt;
mod server;
mod simulate;

use clap::Parser;
use cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use disinfect_config::Config;
use disinfect_core::{Action, DeviceService, RunStatus, TickOutcome};
use disinfect_traits::{ManualClock, MonotonicClock, ScaledClock};
use error_fmt::{Abort, exit_code_for_error, format_error_json, humanize};
use eyre::{Result, WrapErr};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error hooks: {e}");
    }

    let result = load_config(cli.config.as_deref()).and_then(|cfg| {
        init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging)?;
        run(&cli, &cfg)
    });

    if let Err(err) = result {
        tracing::error!(error = %err, "command failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => disinfect_config::load_file(p).wrap_err(Abort::Config),
        None => Ok(Config::default()),
    }
}

fn init_tracing(json: bool, cli_level: Option<&str>, logging: &disinfect_config::Logging) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = cli_level
        .or(logging.level.as_deref())
        .unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .wrap_err_with(|| format!("invalid log level {level:?}"))
        .wrap_err(Abort::Config)?;

    let console = if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };

    let file = logging.file.as_deref().map(|path| {
        let path = Path::new(path);
        let dir = path
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map_or_else(|| "disinfect.log".into(), |n| n.to_os_string());
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        fmt::layer().json().with_ansi(false).with_writer(writer)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .wrap_err("install tracing subscriber")
}

fn run(cli: &Cli, cfg: &Config) -> Result<()> {
    match &cli.cmd {
        Commands::Serve { bind } => {
            let (device, monitor_cfg) = disinfect_core::from_config(cfg, MonotonicClock::new())
                .wrap_err(Abort::Config)?;
            let bind = bind.as_deref().unwrap_or(&cfg.server.bind);
            let rt = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .wrap_err("start async runtime")?;
            rt.block_on(server::serve(device, &monitor_cfg, bind))
        }
        Commands::Simulate {
            program,
            custom_days,
            speed,
            report_ms,
            tank_fault_after_s,
        } => {
            let clock = ScaledClock::new(*speed);
            let (device, monitor_cfg) =
                disinfect_core::from_config(cfg, clock).wrap_err(Abort::Config)?;

            let shutdown = Arc::new(AtomicBool::new(false));
            {
                let flag = shutdown.clone();
                if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
                    tracing::warn!(error = %e, "failed to install Ctrl-C handler");
                }
            }

            let params = simulate::SimParams {
                program: program.clone(),
                custom_days: *custom_days,
                report_every: Duration::from_millis((*report_ms).max(1)),
                tank_fault_after_s: *tank_fault_after_s,
                json: cli.json,
            };
            let summary = simulate::run_simulation(&device, &monitor_cfg, &params, &shutdown)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "event": "completed",
                        "program": summary.program,
                        "duration_s": summary.duration_s,
                        "reports": summary.reports,
                    })
                );
            } else {
                println!(
                    "Program {} completed after {} simulated seconds.",
                    summary.program, summary.duration_s
                );
            }
            Ok(())
        }
        Commands::SelfCheck => self_check(cfg),
    }
}

/// Build the device from the config and drive one short run on a manual clock.
fn self_check(cfg: &Config) -> Result<()> {
    let clock = ManualClock::new();
    let (device, _) = disinfect_core::from_config(cfg, clock.clone()).wrap_err(Abort::Config)?;
    check_run(&device, &clock).wrap_err("self-check")?;
    let catalog = device.catalog();
    if JSON_MODE.get().copied().unwrap_or(false) {
        println!(
            "{}",
            serde_json::json!({
                "status": "ok",
                "programs": catalog.len(),
                "default_program": catalog.default_id(),
            })
        );
    } else {
        println!(
            "OK: {} programs, default program {}",
            catalog.len(),
            catalog.default_id()
        );
    }
    Ok(())
}

fn check_run(device: &DeviceService, clock: &ManualClock) -> Result<()> {
    device.apply(Action::StartProgram { program: None })?;
    let duration = device.snapshot().program_duration;
    clock.advance_secs(duration);
    if device.tick() != TickOutcome::Completed {
        eyre::bail!("program did not complete after its duration");
    }
    if device.snapshot().run_status != RunStatus::Completed {
        eyre::bail!("run status not completed");
    }
    device.apply(Action::Reset)?;
    tracing::debug!(duration_s = duration, "self-check run ok");
    Ok(())
}

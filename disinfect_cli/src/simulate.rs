//! Headless run of one program against an accelerated clock.

use crate::error_fmt::Abort;
use disinfect_core::{
    Action, DeviceService, DeviceSnapshot, Monitor, MonitorCfg, ProgramRef, RunStatus,
};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub struct SimParams {
    pub program: Option<String>,
    pub custom_days: Option<i64>,
    pub report_every: Duration,
    pub tank_fault_after_s: Option<u64>,
    pub json: bool,
}

/// Final state of a finished run.
#[derive(Debug)]
pub struct SimSummary {
    pub program: u8,
    pub duration_s: u64,
    pub reports: usize,
}

fn program_ref(s: &str) -> ProgramRef {
    s.trim()
        .parse::<u64>()
        .map_or_else(|_| ProgramRef::Name(s.to_string()), ProgramRef::Id)
}

fn report(s: &DeviceSnapshot, json: bool) {
    if json {
        println!(
            "{}",
            json!({
                "event": "progress",
                "program": s.active_program,
                "run_status": s.run_status,
                "elapsed_s": s.elapsed_seconds,
                "progress_percent": s.progress_percent,
                "remaining_time": s.remaining_time,
                "tank_level_ok": s.tank_level_ok,
            })
        );
    } else {
        println!(
            "{} {} remaining: {}",
            s.program_name,
            disinfect_ui::render_progress_bar(s.progress_percent, 30),
            s.remaining_time
        );
    }
}

/// Start the program and poll until it completes, faults, or `shutdown` is set.
pub fn run_simulation(
    device: &DeviceService,
    monitor_cfg: &MonitorCfg,
    params: &SimParams,
    shutdown: &Arc<AtomicBool>,
) -> eyre::Result<SimSummary> {
    if let Some(days) = params.custom_days {
        device.apply(Action::SetCustomDays { days })?;
    }
    let program = params.program.as_deref().map(program_ref);
    device.apply(Action::StartProgram { program })?;

    let started = device.snapshot();
    tracing::info!(
        program = started.active_program,
        duration_s = started.program_duration,
        "simulation started"
    );

    let tick = monitor_cfg.tick.min(params.report_every);
    let monitor = Monitor::spawn(device.clone(), tick);
    let mut reports = 0usize;
    let mut drained = false;

    let outcome = loop {
        if shutdown.load(Ordering::Relaxed) {
            break Err(eyre::Report::msg(Abort::Interrupted));
        }
        let s = device.snapshot();
        match s.run_status {
            RunStatus::Completed => break Ok(s),
            RunStatus::Error => break Err(eyre::Report::msg(Abort::TankFault)),
            RunStatus::Idle => break Err(eyre::eyre!("run stopped before completion")),
            RunStatus::Running => {}
        }
        if let (Some(after), Some(elapsed)) = (params.tank_fault_after_s, s.elapsed_seconds) {
            if !drained && elapsed >= after {
                tracing::warn!(elapsed_s = elapsed, "draining tank");
                device.apply(Action::SetTankLevel { level_ok: false })?;
                drained = true;
                continue;
            }
        }
        report(&s, params.json);
        reports += 1;
        std::thread::sleep(params.report_every);
    };
    monitor.stop();

    let done = outcome?;
    report(&done, params.json);
    tracing::info!(program = done.active_program, reports, "simulation completed");
    Ok(SimSummary {
        program: done.active_program,
        duration_s: done.program_duration,
        reports: reports + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use disinfect_core::DeviceState;
    use disinfect_traits::ManualClock;

    fn params() -> SimParams {
        SimParams {
            program: Some("1".into()),
            custom_days: None,
            report_every: Duration::from_millis(2),
            tank_fault_after_s: None,
            json: true,
        }
    }

    #[test]
    fn parses_program_refs() {
        assert_eq!(program_ref("3"), ProgramRef::Id(3));
        assert_eq!(program_ref("Program 4"), ProgramRef::Name("Program 4".into()));
    }

    #[test]
    fn completes_when_clock_passes_duration() {
        let clock = ManualClock::new();
        let device = DeviceService::new(DeviceState::default(), clock.clone());
        let stop = Arc::new(AtomicBool::new(false));
        let cfg = MonitorCfg {
            tick: Duration::from_millis(1),
        };
        let runner = {
            let device = device.clone();
            std::thread::spawn(move || run_simulation(&device, &cfg, &params(), &stop))
        };
        std::thread::sleep(Duration::from_millis(10));
        clock.advance_secs(7 * 86_400);
        let summary = runner.join().unwrap().unwrap();
        assert_eq!(summary.program, 1);
        assert_eq!(summary.duration_s, 7 * 86_400);
    }

    #[test]
    fn interrupted_run_reports_abort() {
        let device = DeviceService::new(DeviceState::default(), ManualClock::new());
        let stop = Arc::new(AtomicBool::new(true));
        let cfg = MonitorCfg::default();
        let err = run_simulation(&device, &cfg, &params(), &stop).unwrap_err();
        assert_eq!(err.downcast_ref::<Abort>(), Some(&Abort::Interrupted));
    }

    #[test]
    fn unknown_program_is_rejected_before_start() {
        let device = DeviceService::new(DeviceState::default(), ManualClock::new());
        let stop = Arc::new(AtomicBool::new(false));
        let mut p = params();
        p.program = Some("Program 9".into());
        let err = run_simulation(&device, &MonitorCfg::default(), &p, &stop).unwrap_err();
        assert!(err.downcast_ref::<disinfect_core::DeviceError>().is_some());
        assert_eq!(device.snapshot().run_status, RunStatus::Idle);
    }
}

//! The simulated device record and every operation that mutates it.
//!
//! Operations take the current instant as an argument instead of reading a
//! clock, so the whole state machine is deterministic under test. Callers
//! that share the device across threads go through `DeviceService`, which
//! serializes access and supplies `now` from its clock.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::action::Action;
use crate::catalog::{Program, ProgramCatalog, ProgramId, ProgramRef};
use crate::config::DeviceSettings;
use crate::error::DeviceError;
use crate::progress::{self, Progress};
use crate::screen::Screen;
use crate::status::{LedStatus, RunStatus};

/// What a monitor tick changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do.
    Idle,
    /// Running program reached its duration.
    Completed,
    /// Default program started after the idle timeout on the start screen.
    AutoStarted,
    /// Auto-start was due but refused; the idle window was re-armed.
    AutoStartRefused,
    /// Running with an empty tank was found and forced into the error state.
    TankFault,
}

/// Point-in-time view of the device, including derived progress fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceSnapshot {
    pub active_program: ProgramId,
    pub program_name: String,
    pub run_status: RunStatus,
    /// `run_status == RUNNING`, for clients of the segmented-display variant.
    pub program_active: bool,
    /// Seconds.
    pub program_duration: u64,
    pub custom_days: u32,
    pub tank_level_ok: bool,
    pub motor_active: bool,
    pub menu_state: Screen,
    /// Same as `menu_state`, for clients of the touchscreen variant.
    pub current_screen: Screen,
    pub led_status: LedStatus,
    pub brightness: u8,
    pub remaining_time: String,
    pub remaining_seconds: Option<u64>,
    pub elapsed_seconds: Option<u64>,
    pub progress_percent: u8,
}

#[derive(Debug, Clone)]
pub struct DeviceState {
    catalog: Arc<ProgramCatalog>,
    settings: DeviceSettings,
    active_program: ProgramId,
    run_status: RunStatus,
    start_time: Option<Instant>,
    program_duration: u64,
    custom_days: u32,
    tank_level_ok: bool,
    motor_active: bool,
    menu_state: Screen,
    idle_entry_time: Option<Instant>,
    brightness: u8,
}

impl DeviceState {
    /// Power-on state: default program selected, idle, tank ok, start screen.
    pub fn new(catalog: Arc<ProgramCatalog>, settings: DeviceSettings) -> Self {
        let custom_days = settings.custom_days.clamp(1, settings.custom_days_limit().max(1));
        let default = catalog.default_program();
        let active_program = default.id;
        let program_duration = default.rule.duration_secs(custom_days);
        let brightness = settings.brightness.min(100);
        Self {
            catalog,
            settings,
            active_program,
            run_status: RunStatus::Idle,
            start_time: None,
            program_duration,
            custom_days,
            tank_level_ok: true,
            motor_active: false,
            menu_state: Screen::Start,
            idle_entry_time: None,
            brightness,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn catalog(&self) -> &ProgramCatalog {
        &self.catalog
    }
    pub fn active_program(&self) -> ProgramId {
        self.active_program
    }
    pub fn run_status(&self) -> RunStatus {
        self.run_status
    }
    pub fn start_time(&self) -> Option<Instant> {
        self.start_time
    }
    /// Seconds.
    pub fn program_duration(&self) -> u64 {
        self.program_duration
    }
    pub fn custom_days(&self) -> u32 {
        self.custom_days
    }
    pub fn tank_level_ok(&self) -> bool {
        self.tank_level_ok
    }
    pub fn motor_active(&self) -> bool {
        self.motor_active
    }
    pub fn menu_state(&self) -> &Screen {
        &self.menu_state
    }
    pub fn idle_entry_time(&self) -> Option<Instant> {
        self.idle_entry_time
    }
    pub fn brightness(&self) -> u8 {
        self.brightness
    }
    pub fn led_status(&self) -> LedStatus {
        self.run_status.into()
    }

    fn active(&self) -> Result<&Program, DeviceError> {
        self.catalog.get(self.active_program)
    }

    // ── Mutating operations ────────────────────────────────────────────────

    /// Select a program without starting it.
    pub fn select_program(&mut self, id: ProgramId) -> Result<(), DeviceError> {
        let rule = self.catalog.get(id)?.rule;
        self.active_program = id;
        self.program_duration = rule.duration_secs(self.custom_days);
        tracing::debug!(program = id, duration_s = self.program_duration, "program selected");
        Ok(())
    }

    /// Set the custom day count; recomputes the duration immediately if the
    /// custom program is selected.
    pub fn set_custom_days(&mut self, days: i64) -> Result<(), DeviceError> {
        let max = self.settings.custom_days_limit();
        let n = u32::try_from(days)
            .ok()
            .filter(|n| (1..=max).contains(n))
            .ok_or(DeviceError::InvalidDayCount { days, max })?;
        let rule = self.active()?.rule;
        self.custom_days = n;
        if rule.is_custom() {
            self.program_duration = rule.duration_secs(n);
        }
        tracing::debug!(custom_days = n, duration_s = self.program_duration, "custom days set");
        Ok(())
    }

    /// Start (or restart) the selected program.
    pub fn start_run(&mut self, now: Instant) -> Result<(), DeviceError> {
        if !self.tank_level_ok {
            return Err(DeviceError::TankFault);
        }
        self.run_status = RunStatus::Running;
        self.start_time = Some(now);
        self.motor_active = true;
        self.set_screen(Screen::Running);
        tracing::info!(
            program = self.active_program,
            duration_s = self.program_duration,
            "program started"
        );
        Ok(())
    }

    /// Stop the run. Leaves the screen as it is.
    pub fn stop_run(&mut self) {
        if self.run_status == RunStatus::Running {
            tracing::info!(program = self.active_program, "program stopped");
        }
        self.run_status = RunStatus::Idle;
        self.motor_active = false;
    }

    /// Update the tank sensor. An empty tank aborts a running program.
    /// A refilled tank does not clear the error; see `reset`.
    pub fn set_tank_level(&mut self, ok: bool) {
        self.tank_level_ok = ok;
        if !ok && self.run_status == RunStatus::Running {
            self.fault_tank();
        }
    }

    fn fault_tank(&mut self) {
        self.stop_run();
        self.run_status = RunStatus::Error;
        self.set_screen(Screen::ErrorTankLow);
        tracing::warn!(program = self.active_program, "tank level low, program aborted");
    }

    /// Show a screen. Unknown identifiers are accepted as `Screen::Unrecognized`.
    pub fn navigate(&mut self, screen: Screen) {
        if !screen.is_recognized() {
            tracing::warn!(screen = %screen, "navigating to unrecognized screen");
        }
        self.set_screen(screen);
    }

    /// Acknowledge a completed or failed run: back to idle on the main menu.
    pub fn reset(&mut self) {
        self.stop_run();
        self.start_time = None;
        self.set_screen(Screen::MainMenu);
    }

    /// Cosmetic; clamped to 0..=100.
    pub fn set_brightness(&mut self, percent: i64) {
        self.brightness = percent.clamp(0, 100) as u8;
    }

    fn set_screen(&mut self, screen: Screen) {
        if !screen.is_entry() {
            self.idle_entry_time = None;
        }
        self.menu_state = screen;
    }

    /// Apply a decoded action as one all-or-nothing step.
    pub fn apply(&mut self, action: Action, now: Instant) -> Result<(), DeviceError> {
        match action {
            Action::StartProgram { program } => {
                let id = match program {
                    Some(r) => Some(self.resolve(&r)?),
                    None => None,
                };
                if !self.tank_level_ok {
                    return Err(DeviceError::TankFault);
                }
                if let Some(id) = id {
                    self.select_program(id)?;
                }
                self.start_run(now)
            }
            Action::StopProgram => {
                self.stop_run();
                self.set_screen(Screen::MainMenu);
                Ok(())
            }
            Action::SelectProgram { program } => {
                let id = self.resolve(&program)?;
                self.select_program(id)
            }
            Action::SetCustomDays { days } => self.set_custom_days(days),
            Action::SetTankLevel { level_ok } => {
                self.set_tank_level(level_ok);
                Ok(())
            }
            Action::Navigate { screen } => {
                self.navigate(screen);
                Ok(())
            }
            Action::SetBrightness { brightness } => {
                self.set_brightness(brightness);
                Ok(())
            }
            Action::Reset => {
                self.reset();
                Ok(())
            }
            Action::Unknown => {
                tracing::warn!("ignoring unknown action");
                Ok(())
            }
        }
    }

    fn resolve(&self, r: &ProgramRef) -> Result<ProgramId, DeviceError> {
        self.catalog.resolve(r).map(|p| p.id)
    }

    // ── Time-driven transitions ─────────────────────────────────────────────

    /// One monitor evaluation.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.run_status == RunStatus::Running {
            if !self.tank_level_ok {
                self.fault_tank();
                return TickOutcome::TankFault;
            }
            let elapsed = self
                .start_time
                .map_or(0, |s| now.saturating_duration_since(s).as_secs());
            if progress::is_expired(elapsed, self.program_duration) {
                self.run_status = RunStatus::Completed;
                self.motor_active = false;
                self.set_screen(Screen::Completed);
                tracing::info!(program = self.active_program, elapsed_s = elapsed, "program completed");
                return TickOutcome::Completed;
            }
        }

        if self.run_status == RunStatus::Idle && self.menu_state.is_entry() {
            let Some(armed) = self.idle_entry_time else {
                self.idle_entry_time = Some(now);
                return TickOutcome::Idle;
            };
            if now.saturating_duration_since(armed) >= self.settings.auto_start_after {
                let default = self.catalog.default_id();
                // Checked first so a refusal leaves the selection untouched.
                if !self.tank_level_ok {
                    tracing::warn!("auto-start refused: tank level low");
                    self.idle_entry_time = Some(now);
                    return TickOutcome::AutoStartRefused;
                }
                let started = self
                    .select_program(default)
                    .and_then(|()| self.start_run(now));
                return match started {
                    Ok(()) => {
                        tracing::info!(program = default, "auto-start after idle timeout");
                        TickOutcome::AutoStarted
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "auto-start refused");
                        self.idle_entry_time = Some(now);
                        TickOutcome::AutoStartRefused
                    }
                };
            }
        }
        TickOutcome::Idle
    }

    // ── Reads ──────────────────────────────────────────────────────────────

    pub fn progress(&self, now: Instant) -> Progress {
        progress::progress(now, self.start_time, self.program_duration, self.run_status)
    }

    pub fn snapshot(&self, now: Instant) -> DeviceSnapshot {
        let p = self.progress(now);
        let program_name = self
            .active()
            .map(|p| p.name.clone())
            .unwrap_or_else(|_| format!("Program {}", self.active_program));
        DeviceSnapshot {
            active_program: self.active_program,
            program_name,
            run_status: self.run_status,
            program_active: self.run_status == RunStatus::Running,
            program_duration: self.program_duration,
            custom_days: self.custom_days,
            tank_level_ok: self.tank_level_ok,
            motor_active: self.motor_active,
            menu_state: self.menu_state.clone(),
            current_screen: self.menu_state.clone(),
            led_status: self.led_status(),
            brightness: self.brightness,
            remaining_time: p.remaining.to_string(),
            remaining_seconds: p.remaining.secs(),
            elapsed_seconds: p.elapsed_secs,
            progress_percent: p.percent,
        }
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new(Arc::new(ProgramCatalog::standard()), DeviceSettings::default())
    }
}

#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Device model of the disinfection unit (hardware-agnostic).
//!
//! A unit runs one disinfection program at a time for a number of days,
//! while a background monitor completes expired runs and guards the tank.
//! Time comes from `disinfect_traits::Clock`, so the whole model runs
//! unchanged against the real clock, an accelerated one, or a manual one.
//!
//! ## Architecture
//!
//! - **Catalog**: programs and their duration rules (`catalog` module)
//! - **Device**: the single state record and its operations (`device` module)
//! - **Progress**: percent and remaining time, derived on read (`progress` module)
//! - **Screens**: menu identifiers of both display variants (`screen` module)
//! - **Actions**: the wire form of operations (`action` module)
//! - **Service**: shared, locked access to the device (`service` module)
//! - **Monitor**: background tick thread (`monitor` module)
//!
//! ## Time
//!
//! Durations and elapsed time are whole seconds. Operations take `now` as an
//! argument; only the service reads the clock.

pub mod action;
pub mod catalog;
pub mod config;
pub mod conversions;
pub mod device;
pub mod error;
pub mod monitor;
pub mod progress;
pub mod screen;
pub mod service;
pub mod status;
pub mod util;

pub use action::Action;
pub use catalog::{DurationRule, Program, ProgramCatalog, ProgramId, ProgramRef};
pub use config::{DeviceSettings, MonitorCfg};
pub use device::{DeviceSnapshot, DeviceState, TickOutcome};
pub use error::{DeviceError, Result};
pub use monitor::Monitor;
pub use progress::{Progress, Remaining, RemainingTime};
pub use screen::{MAIN_MENU_ITEMS, MenuItem, Screen};
pub use service::DeviceService;
pub use status::{LedStatus, RunStatus};

use disinfect_traits::Clock;
use eyre::WrapErr;

/// Build the shared device and its monitor cadence from a validated config.
pub fn from_config<C: Clock + Send + Sync + 'static>(
    cfg: &disinfect_config::Config,
    clock: C,
) -> Result<(DeviceService, MonitorCfg)> {
    let state = DeviceState::try_from(cfg).wrap_err("build device from config")?;
    Ok((DeviceService::new(state, clock), MonitorCfg::from(&cfg.monitor)))
}

#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the disinfection-unit simulator.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Every section is optional; an empty file yields the factory defaults
//!   (program 2 with 14 days selected, 7 custom days, 1 s monitor cadence).
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Upper bound for the monitor cadence. Slower ticks would change what a
/// reader observes at one-second resolution.
pub const MAX_TICK_MS: u64 = 1_000;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Server {
    /// Socket address for the HTTP surface, e.g. "127.0.0.1:5000".
    pub bind: String,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Monitor {
    /// Interval between monitor ticks in milliseconds (1..=1000).
    pub tick_ms: u64,
    /// Idle time on the start screen before the default program auto-starts.
    pub auto_start_after_s: u64,
}

impl Default for Monitor {
    fn default() -> Self {
        Self {
            tick_ms: 1_000,
            auto_start_after_s: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Device {
    /// Program selected at power-on and used by the auto-start.
    pub default_program: u8,
    /// Initial day count for the custom program slot.
    pub custom_days: u32,
    /// Optional cap on the day count accepted by `set_custom_days`;
    /// unbounded when omitted.
    pub max_custom_days: Option<u32>,
    /// Initial display brightness in percent.
    pub brightness: u8,
}

impl Default for Device {
    fn default() -> Self {
        Self {
            default_program: 2,
            custom_days: 7,
            max_custom_days: None,
            brightness: 80,
        }
    }
}

/// One catalog entry. Exactly one of `days` / `custom = true` must be given.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ProgramCfg {
    pub id: u8,
    pub name: String,
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default)]
    pub custom: bool,
}

impl ProgramCfg {
    fn fixed(id: u8, days: u32) -> Self {
        Self {
            id,
            name: format!("Program {id}"),
            days: Some(days),
            custom: false,
        }
    }

    fn custom(id: u8) -> Self {
        Self {
            id,
            name: format!("Program {id}"),
            days: None,
            custom: true,
        }
    }
}

/// Factory catalog: 7, 14 and 21 days plus one custom slot.
pub fn default_programs() -> Vec<ProgramCfg> {
    vec![
        ProgramCfg::fixed(1, 7),
        ProgramCfg::fixed(2, 14),
        ProgramCfg::fixed(3, 21),
        ProgramCfg::custom(4),
    ]
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub server: Server,
    pub monitor: Monitor,
    pub device: Device,
    pub logging: Logging,
    /// Program catalog; replaces the factory catalog entirely when present.
    pub programs: Vec<ProgramCfg>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: Server::default(),
            monitor: Monitor::default(),
            device: Device::default(),
            logging: Logging::default(),
            programs: default_programs(),
        }
    }
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))?;
    cfg.validate()?;
    Ok(cfg)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Server
        if self.server.bind.trim().is_empty() {
            eyre::bail!("server.bind must not be empty");
        }

        // Monitor
        if self.monitor.tick_ms == 0 || self.monitor.tick_ms > MAX_TICK_MS {
            eyre::bail!("monitor.tick_ms must be in [1, {MAX_TICK_MS}]");
        }
        if self.monitor.auto_start_after_s == 0 {
            eyre::bail!("monitor.auto_start_after_s must be >= 1");
        }

        // Device
        if self.device.max_custom_days == Some(0) {
            eyre::bail!("device.max_custom_days must be >= 1");
        }
        let max_days = self.device.max_custom_days.unwrap_or(u32::MAX);
        if self.device.custom_days == 0 || self.device.custom_days > max_days {
            eyre::bail!("device.custom_days must be in [1, {max_days}]");
        }
        if self.device.brightness > 100 {
            eyre::bail!("device.brightness must be in [0, 100]");
        }

        // Programs
        if self.programs.is_empty() {
            eyre::bail!("programs must define at least one program");
        }
        let mut seen = HashSet::new();
        for p in &self.programs {
            if !seen.insert(p.id) {
                eyre::bail!("programs: duplicate id {}", p.id);
            }
            if p.name.trim().is_empty() {
                eyre::bail!("programs[id={}].name must not be empty", p.id);
            }
            match (p.days, p.custom) {
                (Some(_), true) => {
                    eyre::bail!("programs[id={}]: set either days or custom, not both", p.id)
                }
                (None, false) => {
                    eyre::bail!("programs[id={}]: one of days or custom = true is required", p.id)
                }
                (Some(0), false) => eyre::bail!("programs[id={}].days must be >= 1", p.id),
                _ => {}
            }
        }
        if !seen.contains(&self.device.default_program) {
            eyre::bail!(
                "device.default_program {} is not in the program catalog",
                self.device.default_program
            );
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}

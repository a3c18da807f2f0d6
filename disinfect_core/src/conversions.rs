//! Conversions from `disinfect_config` types to `disinfect_core` types.

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{DurationRule, Program, ProgramCatalog};
use crate::config::{DeviceSettings, MonitorCfg};
use crate::device::DeviceState;
use crate::error::DeviceError;

// ── Catalog ──────────────────────────────────────────────────────────────────

impl TryFrom<&disinfect_config::ProgramCfg> for Program {
    type Error = DeviceError;

    fn try_from(c: &disinfect_config::ProgramCfg) -> Result<Self, Self::Error> {
        let rule = match (c.days, c.custom) {
            (Some(days), false) => DurationRule::FixedDays(days),
            (None, true) => DurationRule::Custom,
            _ => {
                return Err(DeviceError::Config(format!(
                    "program {} must set exactly one of days or custom",
                    c.id
                )));
            }
        };
        Ok(Self {
            id: c.id,
            name: c.name.clone(),
            rule,
        })
    }
}

impl TryFrom<&disinfect_config::Config> for ProgramCatalog {
    type Error = DeviceError;

    fn try_from(c: &disinfect_config::Config) -> Result<Self, Self::Error> {
        let programs = c
            .programs
            .iter()
            .map(Program::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        ProgramCatalog::new(programs, c.device.default_program)
    }
}

// ── Settings ─────────────────────────────────────────────────────────────────

impl From<&disinfect_config::Config> for DeviceSettings {
    fn from(c: &disinfect_config::Config) -> Self {
        Self {
            custom_days: c.device.custom_days,
            max_custom_days: c.device.max_custom_days,
            brightness: c.device.brightness,
            auto_start_after: Duration::from_secs(c.monitor.auto_start_after_s),
        }
    }
}

impl From<&disinfect_config::Monitor> for MonitorCfg {
    fn from(c: &disinfect_config::Monitor) -> Self {
        Self {
            tick: Duration::from_millis(c.tick_ms),
        }
    }
}

impl TryFrom<&disinfect_config::Config> for DeviceState {
    type Error = DeviceError;

    fn try_from(c: &disinfect_config::Config) -> Result<Self, Self::Error> {
        let catalog = ProgramCatalog::try_from(c)?;
        Ok(DeviceState::new(Arc::new(catalog), DeviceSettings::from(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_standard_catalog() {
        let cfg = disinfect_config::Config::default();
        let catalog = ProgramCatalog::try_from(&cfg).unwrap();
        let standard = ProgramCatalog::standard();
        assert!(catalog.iter().eq(standard.iter()));
        assert_eq!(catalog.default_id(), standard.default_id());
        assert_eq!(DeviceSettings::from(&cfg), DeviceSettings::default());
        assert_eq!(MonitorCfg::from(&cfg.monitor), MonitorCfg::default());
    }

    #[test]
    fn custom_catalog_from_toml() {
        let cfg = disinfect_config::load_toml(
            r#"
            [device]
            default_program = 7

            [[programs]]
            id = 7
            name = "Weekly"
            days = 7

            [[programs]]
            id = 9
            name = "Own"
            custom = true
            "#,
        )
        .unwrap();
        let state = DeviceState::try_from(&cfg).unwrap();
        assert_eq!(state.active_program(), 7);
        assert_eq!(state.program_duration(), 7 * 86_400);
        assert_eq!(state.catalog().get(9).unwrap().rule, DurationRule::Custom);
    }

    #[test]
    fn ambiguous_program_is_rejected() {
        let bad = disinfect_config::ProgramCfg {
            id: 1,
            name: "x".into(),
            days: Some(3),
            custom: true,
        };
        assert!(Program::try_from(&bad).is_err());
    }
}

//! Runtime configuration types for the device model.
//!
//! These are separate from the TOML-deserialized config in `disinfect_config`;
//! see `conversions` for the mapping.

use std::time::Duration;

/// Power-on settings of the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSettings {
    /// Initial custom day count.
    pub custom_days: u32,
    /// Largest accepted custom day count; `None` accepts anything that fits in `u32`.
    pub max_custom_days: Option<u32>,
    /// Initial display brightness in percent.
    pub brightness: u8,
    /// Idle time on the start screen before the default program auto-starts.
    pub auto_start_after: Duration,
}

impl DeviceSettings {
    pub fn custom_days_limit(&self) -> u32 {
        self.max_custom_days.unwrap_or(u32::MAX)
    }
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            custom_days: 7,
            max_custom_days: None,
            brightness: 80,
            auto_start_after: Duration::from_secs(30),
        }
    }
}

/// Monitor loop cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorCfg {
    pub tick: Duration,
}

impl Default for MonitorCfg {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
        }
    }
}

//! Actions accepted by the device, as they arrive from a front panel or over HTTP.
//!
//! Wire form is a JSON object tagged by `action`:
//! `{"action": "start_program", "program": 1}`.

use serde::Deserialize;
use serde_json::Value;

use crate::catalog::ProgramRef;
use crate::error::DeviceError;
use crate::screen::Screen;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Start the selected program, or select `program` first.
    StartProgram {
        #[serde(default)]
        program: Option<ProgramRef>,
    },
    /// Stop the run and return to the main menu.
    StopProgram,
    #[serde(alias = "change_program")]
    SelectProgram { program: ProgramRef },
    SetCustomDays { days: i64 },
    SetTankLevel { level_ok: bool },
    #[serde(alias = "set_menu_state")]
    Navigate {
        #[serde(alias = "state")]
        screen: Screen,
    },
    SetBrightness { brightness: i64 },
    Reset,
    /// Any other action name. Applying it is a no-op.
    #[serde(other)]
    Unknown,
}

impl Action {
    /// Decode a request body. An object without an `action` name (absent or
    /// `null`) decodes to `Unknown`; anything that is not an object is rejected.
    pub fn from_json(value: &Value) -> Result<Self, DeviceError> {
        let Some(body) = value.as_object() else {
            return Err(DeviceError::InvalidRequest(
                "action body must be a JSON object".into(),
            ));
        };
        if body.get("action").is_none_or(Value::is_null) {
            return Ok(Self::Unknown);
        }
        Self::deserialize(value).map_err(|e| DeviceError::InvalidRequest(e.to_string()))
    }

    /// Wire name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::StartProgram { .. } => "start_program",
            Action::StopProgram => "stop_program",
            Action::SelectProgram { .. } => "select_program",
            Action::SetCustomDays { .. } => "set_custom_days",
            Action::SetTankLevel { .. } => "set_tank_level",
            Action::Navigate { .. } => "navigate",
            Action::SetBrightness { .. } => "set_brightness",
            Action::Reset => "reset",
            Action::Unknown => "unknown",
        }
    }
}

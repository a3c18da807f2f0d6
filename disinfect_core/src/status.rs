//! Run-level phase of the device and the indicator LED derived from it.

use serde::Serialize;

/// Run status of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// No program running; ready to start.
    #[default]
    Idle,
    /// Program running; motor on.
    Running,
    /// Program ran to its full duration; waiting for acknowledgement.
    Completed,
    /// Run aborted by a tank fault; waiting for reset.
    Error,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Idle => "IDLE",
            RunStatus::Running => "RUNNING",
            RunStatus::Completed => "COMPLETED",
            RunStatus::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color of the RGB status LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LedStatus {
    /// Green.
    Normal,
    /// Blue.
    ProgramActive,
    /// Green and blue.
    Completed,
    /// Red.
    Problem,
}

impl From<RunStatus> for LedStatus {
    fn from(s: RunStatus) -> Self {
        match s {
            RunStatus::Idle => LedStatus::Normal,
            RunStatus::Running => LedStatus::ProgramActive,
            RunStatus::Completed => LedStatus::Completed,
            RunStatus::Error => LedStatus::Problem,
        }
    }
}

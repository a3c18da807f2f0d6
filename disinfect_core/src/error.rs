use thiserror::Error;

/// Failures of the device operations. Every failing operation leaves the
/// device state untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("unknown program: {0}")]
    UnknownProgram(String),
    #[error("invalid day count {days}: must be in [1, {max}]")]
    InvalidDayCount { days: i64, max: u32 },
    #[error("tank fault: cannot start a program while the tank level is low")]
    TankFault,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl DeviceError {
    /// Stable machine-readable name, used in JSON error bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DeviceError::UnknownProgram(_) => "UnknownProgram",
            DeviceError::InvalidDayCount { .. } => "InvalidDayCount",
            DeviceError::TankFault => "TankFault",
            DeviceError::InvalidRequest(_) => "InvalidRequest",
            DeviceError::Config(_) => "Config",
        }
    }
}

pub type Result<T> = eyre::Result<T>;

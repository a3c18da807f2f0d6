//! Human-readable error descriptions, exit codes, and structured JSON error formatting.

use disinfect_core::DeviceError;
use std::fmt;

/// Reasons a command ends early. Attached to reports as context so the exit
/// code survives any further wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abort {
    Config,
    TankFault,
    Interrupted,
}

impl Abort {
    pub fn name(self) -> &'static str {
        match self {
            Abort::Config => "Config",
            Abort::TankFault => "TankFault",
            Abort::Interrupted => "Interrupted",
        }
    }
}

impl fmt::Display for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Abort::Config => f.write_str("invalid configuration"),
            Abort::TankFault => f.write_str("program aborted: tank level low"),
            Abort::Interrupted => f.write_str("interrupted"),
        }
    }
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(a) = err.downcast_ref::<Abort>() {
        return match a {
            Abort::Config => format!(
                "What happened: The configuration could not be loaded ({}).\nLikely causes: Missing file, TOML syntax error, or out-of-range values.\nHow to fix: Edit the config file, then rerun. See etc/disinfect.toml for a sample.",
                root_message(err)
            ),
            Abort::TankFault => "What happened: The running program was aborted because the tank level dropped.\nLikely causes: --tank-fault-after-s was reached, or the tank sensor reported low.\nHow to fix: Refill the tank, reset the device, and start the program again.".to_string(),
            Abort::Interrupted => "What happened: The run was interrupted before the program finished.\nLikely causes: Ctrl-C or a termination signal.\nHow to fix: Rerun the command; use a higher --speed to finish sooner.".to_string(),
        };
    }

    if let Some(de) = err.downcast_ref::<DeviceError>() {
        return match de {
            DeviceError::UnknownProgram(p) => format!(
                "What happened: Program '{p}' does not exist.\nLikely causes: Typo in --program, or the config defines a different catalog.\nHow to fix: Pass a program id or name from the catalog (e.g. `--program 1`)."
            ),
            DeviceError::InvalidDayCount { days, max } => format!(
                "What happened: {days} is not a valid custom day count.\nLikely causes: Zero, negative, or above the allowed maximum ({max}, see device.max_custom_days).\nHow to fix: Pass a value between 1 and {max}."
            ),
            DeviceError::TankFault => "What happened: A program cannot start while the tank level is low.\nLikely causes: The tank sensor reports empty.\nHow to fix: Refill the tank, then start again.".to_string(),
            DeviceError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Inconsistent [[programs]] or [device] values.\nHow to fix: Edit the config file, then rerun."
            ),
            DeviceError::InvalidRequest(msg) => format!(
                "What happened: {msg}.\nLikely causes: Malformed action.\nHow to fix: Re-run with --log-level=debug for more detail."
            ),
        };
    }

    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();
    if lower.contains("address already in use") || lower.contains("bind") {
        return format!(
            "What happened: The HTTP server could not listen ({msg}).\nLikely causes: Another process uses the port, or the address is invalid.\nHow to fix: Pick another address with --bind or server.bind."
        );
    }

    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

fn root_message(err: &eyre::Report) -> String {
    err.chain()
        .last()
        .map_or_else(|| err.to_string(), ToString::to_string)
}

/// Stable exit codes: 2 config, 3 tank fault, 4 interrupted, 1 anything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(a) = err.downcast_ref::<Abort>() {
        return match a {
            Abort::Config => 2,
            Abort::TankFault => 3,
            Abort::Interrupted => 4,
        };
    }
    if let Some(DeviceError::Config(_)) = err.downcast_ref::<DeviceError>() {
        return 2;
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let reason = err
        .downcast_ref::<Abort>()
        .map(|a| a.name())
        .or_else(|| err.downcast_ref::<DeviceError>().map(DeviceError::kind))
        .unwrap_or("Error");
    json!({
        "reason": reason,
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}

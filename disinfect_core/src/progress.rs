//! Progress of a running program: completion percent and remaining time.
//!
//! Everything here is a pure function of `(now, start, duration, status)`;
//! nothing is stored. Elapsed time is measured in whole seconds.

use std::fmt;
use std::time::Instant;

use crate::status::RunStatus;
use crate::util::{SECS_PER_DAY, SECS_PER_HOUR, SECS_PER_MIN};

/// Remaining time split into whole days, hours and minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemainingTime {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    /// Exact remaining seconds before the breakdown.
    pub total_secs: u64,
}

impl RemainingTime {
    pub fn from_secs(secs: u64) -> Self {
        Self {
            days: secs / SECS_PER_DAY,
            hours: (secs % SECS_PER_DAY) / SECS_PER_HOUR,
            minutes: (secs % SECS_PER_HOUR) / SECS_PER_MIN,
            total_secs: secs,
        }
    }
}

fn unit(n: u64, singular: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {singular}s")
    }
}

impl fmt::Display for RemainingTime {
    /// Days are dropped when zero; hours are always shown next to days.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(
                f,
                "{} {} {}",
                unit(self.days, "day"),
                unit(self.hours, "hour"),
                unit(self.minutes, "minute")
            )
        } else if self.hours > 0 {
            write!(f, "{} {}", unit(self.hours, "hour"), unit(self.minutes, "minute"))
        } else {
            f.write_str(&unit(self.minutes, "minute"))
        }
    }
}

/// Remaining-time reading, with sentinels for the cases where no countdown applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    /// Not running.
    Ready,
    /// Running without a determined duration.
    Individual,
    /// Duration fully elapsed; the monitor has not completed the run yet.
    Expired,
    Left(RemainingTime),
}

impl Remaining {
    pub fn secs(&self) -> Option<u64> {
        match self {
            Remaining::Left(r) => Some(r.total_secs),
            Remaining::Expired => Some(0),
            Remaining::Ready | Remaining::Individual => None,
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Remaining::Ready => f.write_str("Ready"),
            Remaining::Individual => f.write_str("Individual"),
            Remaining::Expired => f.write_str("Expired"),
            Remaining::Left(r) => r.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 0..=100, floored.
    pub percent: u8,
    pub remaining: Remaining,
    /// Whole seconds since the run started; `None` when not running.
    pub elapsed_secs: Option<u64>,
}

impl Progress {
    pub const READY: Progress = Progress {
        percent: 0,
        remaining: Remaining::Ready,
        elapsed_secs: None,
    };
}

/// Derive progress from the device's timing fields.
///
/// A `Running` status without a start instant is treated like elapsed = 0.
pub fn progress(
    now: Instant,
    start: Option<Instant>,
    duration_secs: u64,
    status: RunStatus,
) -> Progress {
    if status != RunStatus::Running {
        return Progress::READY;
    }
    let elapsed = start.map_or(0, |s| now.saturating_duration_since(s).as_secs());
    from_elapsed(elapsed, duration_secs)
}

/// Progress of a running program after `elapsed_secs` of `duration_secs`.
pub fn from_elapsed(elapsed_secs: u64, duration_secs: u64) -> Progress {
    if duration_secs == 0 {
        return Progress {
            percent: 0,
            remaining: Remaining::Individual,
            elapsed_secs: Some(elapsed_secs),
        };
    }
    if elapsed_secs >= duration_secs {
        return Progress {
            percent: 100,
            remaining: Remaining::Expired,
            elapsed_secs: Some(elapsed_secs),
        };
    }
    // elapsed < duration, so the quotient is < 100; u128 keeps the product exact.
    let percent = (u128::from(elapsed_secs) * 100 / u128::from(duration_secs)) as u8;
    Progress {
        percent,
        remaining: Remaining::Left(RemainingTime::from_secs(duration_secs - elapsed_secs)),
        elapsed_secs: Some(elapsed_secs),
    }
}

/// True once a running program has used up its (non-zero) duration.
#[inline]
pub fn is_expired(elapsed_secs: u64, duration_secs: u64) -> bool {
    duration_secs > 0 && elapsed_secs >= duration_secs
}

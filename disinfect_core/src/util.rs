//! Common time helpers for disinfect_core.

/// Number of seconds in one minute.
pub const SECS_PER_MIN: u64 = 60;
/// Number of seconds in one hour.
pub const SECS_PER_HOUR: u64 = 60 * SECS_PER_MIN;
/// Number of seconds in one day.
pub const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Convert a day count to seconds, saturating on overflow.
#[inline]
pub fn days_to_secs(days: u32) -> u64 {
    u64::from(days).saturating_mul(SECS_PER_DAY)
}

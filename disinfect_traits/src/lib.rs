pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock, ScaledClock};

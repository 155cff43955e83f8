use crate::TimeSource;
use chrono::{DateTime, Local};

/// A `TimeSource` backed by the system's wall clock in the local time zone.
///
/// Wall-clock adjustments (NTP, manual changes) are observed as-is; campaign
/// windows are defined in calendar time, so following the wall clock is the
/// desired behavior.
#[derive(Default, Clone, Copy, Debug)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

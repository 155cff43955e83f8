use chrono::{DateTime, Local};

/// A trait for time sources that return the current local wall-clock time.
///
/// Campaign windows are calendar-based (a campaign starts at midnight and
/// expires at 23:59:59 local time), so unlike a monotonic millisecond counter
/// the time source hands out full [`DateTime<Local>`] values.
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// time source in tests.
///
/// # Example
/// ```
/// use chrono::{DateTime, Local, TimeZone};
/// use coupon_pool::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn now(&self) -> DateTime<Local> {
///         Local.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.now().format("%H:%M").to_string(), "12:00");
/// ```
pub trait TimeSource {
    /// Returns the current local time.
    fn now(&self) -> DateTime<Local>;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

use crate::{Error, Result};
use chrono::{DateTime, Local, NaiveDate};

/// Calendar date format accepted by [`CampaignWindow::from_dates`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Rendering used for window boundaries in [`CampaignInfo`].
///
/// [`CampaignInfo`]: crate::CampaignInfo
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The inclusive `[starts_at, expires_at]` interval during which a campaign
/// issues coupons and its coupons can be redeemed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CampaignWindow {
    starts_at: DateTime<Local>,
    expires_at: DateTime<Local>,
}

impl CampaignWindow {
    /// Creates a window from explicit boundaries.
    ///
    /// # Errors
    /// Returns [`Error::InvalidWindow`] if `expires_at` precedes `starts_at`.
    pub fn new(starts_at: DateTime<Local>, expires_at: DateTime<Local>) -> Result<Self> {
        if expires_at < starts_at {
            return Err(Error::InvalidWindow {
                starts_at: starts_at.format(TIMESTAMP_FORMAT).to_string(),
                expires_at: expires_at.format(TIMESTAMP_FORMAT).to_string(),
            });
        }
        Ok(Self {
            starts_at,
            expires_at,
        })
    }

    /// Creates a window from two `YYYY-MM-DD` calendar dates.
    ///
    /// The window opens at 00:00:00 on `start` and closes at 23:59:59 on
    /// `end`, both in the local time zone. A single-day campaign uses the same
    /// date twice.
    ///
    /// # Errors
    /// - [`Error::InvalidDate`] if either date is malformed or the boundary
    ///   time does not exist locally (e.g. skipped by a DST transition).
    /// - [`Error::InvalidWindow`] if `end` is before `start`.
    ///
    /// # Example
    /// ```
    /// use coupon_pool::CampaignWindow;
    ///
    /// let window = CampaignWindow::from_dates("2025-05-01", "2025-05-31")?;
    /// assert_eq!(window.starts_at_formatted(), "2025-05-01 00:00:00");
    /// assert_eq!(window.expires_at_formatted(), "2025-05-31 23:59:59");
    /// # Ok::<(), coupon_pool::Error>(())
    /// ```
    pub fn from_dates(start: &str, end: &str) -> Result<Self> {
        let first_day = parse_date(start)?;
        let last_day = parse_date(end)?;

        let starts_at = first_day
            .and_hms_opt(0, 0, 0)
            .and_then(|at| at.and_local_timezone(Local).earliest())
            .ok_or_else(|| nonexistent(start))?;
        let expires_at = last_day
            .and_hms_opt(23, 59, 59)
            .and_then(|at| at.and_local_timezone(Local).latest())
            .ok_or_else(|| nonexistent(end))?;

        Self::new(starts_at, expires_at)
    }

    pub fn starts_at(&self) -> DateTime<Local> {
        self.starts_at
    }

    pub fn expires_at(&self) -> DateTime<Local> {
        self.expires_at
    }

    pub fn starts_at_formatted(&self) -> String {
        self.starts_at.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn expires_at_formatted(&self) -> String {
        self.expires_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Returns `true` if `now` lies within the window, boundaries included.
    pub fn contains(&self, now: DateTime<Local>) -> bool {
        self.starts_at <= now && now <= self.expires_at
    }
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|err| Error::InvalidDate {
        input: input.to_string(),
        reason: err.to_string(),
    })
}

fn nonexistent(input: &str) -> Error {
    Error::InvalidDate {
        input: input.to_string(),
        reason: "time does not exist in the local time zone".to_string(),
    }
}

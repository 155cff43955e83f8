use crate::{CampaignWindow, Error, Result};
use chrono::{DateTime, Local};

/// Lifecycle of a single coupon.
///
/// Transitions are linear: `Unpublished -> Published -> Used`. A coupon that
/// is used is necessarily published, and `Used` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CouponState {
    /// Generated with the campaign, still sitting in the pool.
    Unpublished,
    /// Withdrawn from the pool and handed to a requester.
    Published,
    /// Redeemed.
    Used,
}

/// A single-use coupon belonging to one campaign.
///
/// The validity window is copied from the campaign when the coupon is
/// generated and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coupon {
    code: String,
    window: CampaignWindow,
    state: CouponState,
}

impl Coupon {
    pub(crate) fn new(code: String, window: CampaignWindow) -> Self {
        Self {
            code,
            window,
            state: CouponState::Unpublished,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn starts_at(&self) -> DateTime<Local> {
        self.window.starts_at()
    }

    pub fn expires_at(&self) -> DateTime<Local> {
        self.window.expires_at()
    }

    pub fn state(&self) -> CouponState {
        self.state
    }

    pub fn is_published(&self) -> bool {
        matches!(self.state, CouponState::Published | CouponState::Used)
    }

    pub fn is_used(&self) -> bool {
        self.state == CouponState::Used
    }

    /// Moves an unpublished coupon to `Published`.
    pub(crate) fn publish(&mut self, now: DateTime<Local>) -> Result<()> {
        if self.state != CouponState::Unpublished {
            return Err(Error::CouponAlreadyPublished {
                code: self.code.clone(),
            });
        }
        self.ensure_active(now)?;
        self.state = CouponState::Published;
        Ok(())
    }

    /// Moves a published coupon to `Used`.
    ///
    /// State is checked before the window, so redeeming a spent coupon after
    /// expiry still reports [`Error::CouponAlreadyUsed`].
    pub(crate) fn redeem(&mut self, now: DateTime<Local>) -> Result<()> {
        match self.state {
            CouponState::Unpublished => Err(Error::CouponNotPublished {
                code: self.code.clone(),
            }),
            CouponState::Used => Err(Error::CouponAlreadyUsed {
                code: self.code.clone(),
            }),
            CouponState::Published => {
                self.ensure_active(now)?;
                self.state = CouponState::Used;
                Ok(())
            }
        }
    }

    fn ensure_active(&self, now: DateTime<Local>) -> Result<()> {
        if self.window.contains(now) {
            Ok(())
        } else {
            Err(Error::CouponNotActive {
                code: self.code.clone(),
            })
        }
    }
}

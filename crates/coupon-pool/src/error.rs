/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `coupon-pool` can emit.
///
/// Every variant is terminal and detected locally: nothing is retried inside
/// the crate. The [`Display`](core::fmt::Display) rendering is meant to be
/// shown to end users as-is.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A campaign with this identifier is already registered.
    #[error("campaign `{campaign_id}` already exists")]
    CampaignExists { campaign_id: String },

    /// No campaign with this identifier is registered.
    #[error("campaign `{campaign_id}` does not exist")]
    CampaignNotFound { campaign_id: String },

    /// The request was made before the campaign started or after it expired.
    #[error("campaign `{campaign_id}` is not active at this time")]
    CampaignNotActive { campaign_id: String },

    /// Every coupon of the campaign has already been issued.
    #[error("no more coupons available in campaign `{campaign_id}`")]
    CouponsExhausted { campaign_id: String },

    /// The campaign never generated a coupon with this code.
    #[error("coupon `{code}` does not exist")]
    CouponNotFound { code: String },

    /// The coupon exists but was never issued.
    #[error("coupon `{code}` has not been issued")]
    CouponNotPublished { code: String },

    /// The coupon was issued twice. Withdrawal from the pool and publication
    /// happen in one step, so this is only observable on a bare [`Coupon`].
    ///
    /// [`Coupon`]: crate::Coupon
    #[error("coupon `{code}` has already been issued")]
    CouponAlreadyPublished { code: String },

    /// The coupon has already been redeemed.
    #[error("coupon `{code}` has already been used")]
    CouponAlreadyUsed { code: String },

    /// The coupon was used outside of its validity window.
    #[error("coupon `{code}` is not valid at this time")]
    CouponNotActive { code: String },

    /// The random source failed, or it kept producing codes that already
    /// exist in the campaign being created.
    #[error("failed to generate coupon code: {reason}")]
    CodeGeneration { reason: String },

    /// A calendar date could not be parsed or does not exist locally.
    #[error("invalid date `{input}`: {reason}")]
    InvalidDate { input: String, reason: String },

    /// The campaign would expire before it starts.
    #[error("campaign window ends ({expires_at}) before it starts ({starts_at})")]
    InvalidWindow {
        starts_at: String,
        expires_at: String,
    },
}

impl Error {
    /// Stable, machine-readable name of the variant.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CampaignExists { .. } => "CAMPAIGN_EXISTS",
            Self::CampaignNotFound { .. } => "CAMPAIGN_NOT_FOUND",
            Self::CampaignNotActive { .. } => "CAMPAIGN_NOT_ACTIVE",
            Self::CouponsExhausted { .. } => "COUPONS_EXHAUSTED",
            Self::CouponNotFound { .. } => "COUPON_NOT_FOUND",
            Self::CouponNotPublished { .. } => "COUPON_NOT_PUBLISHED",
            Self::CouponAlreadyPublished { .. } => "COUPON_ALREADY_PUBLISHED",
            Self::CouponAlreadyUsed { .. } => "COUPON_ALREADY_USED",
            Self::CouponNotActive { .. } => "COUPON_NOT_ACTIVE",
            Self::CodeGeneration { .. } => "CODE_GENERATION_FAILURE",
            Self::InvalidDate { .. } => "INVALID_DATE",
            Self::InvalidWindow { .. } => "INVALID_WINDOW",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_identifier() {
        let err = Error::CouponsExhausted {
            campaign_id: "c1".to_string(),
        };
        assert_eq!(err.to_string(), "no more coupons available in campaign `c1`");
        assert_eq!(err.code(), "COUPONS_EXHAUSTED");

        let err = Error::CouponAlreadyUsed {
            code: "123가나".to_string(),
        };
        assert_eq!(err.to_string(), "coupon `123가나` has already been used");
    }
}

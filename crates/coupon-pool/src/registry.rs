use crate::{
    Campaign, CampaignInfo, CampaignWindow, CodeGenerator, Coupon, Error, MAX_CODE_LENGTH,
    OsRandom, RandSource, Result, SystemClock, TimeSource,
};
use parking_lot::RwLock;
use std::collections::{HashMap, hash_map::Entry};
use std::sync::Arc;
#[cfg(feature = "tracing")]
use tracing::instrument;

#[cfg(test)]
mod tests;

/// The lookup table from campaign identifier to campaign.
///
/// Construct one registry at startup and share it (e.g. behind an [`Arc`])
/// with every request handler. The registry exclusively owns its campaigns;
/// callers only ever see [`Coupon`] and [`CampaignInfo`] snapshots.
///
/// ## Locking
///
/// Two independent lock domains are involved:
///
/// 1. The registry lock guards only the identifier map. Lookups take it in
///    shared mode just long enough to clone the campaign handle; creation
///    takes it exclusively only for the final insert.
/// 2. Each campaign's own lock guards its pool and coupon states.
///
/// The registry lock is always released before a campaign lock is acquired,
/// so no thread ever waits on a campaign while holding the registry.
///
/// Coupon pools are generated before the registry lock is taken, so creating
/// a large campaign never blocks lookups or creations of other campaigns.
pub struct CampaignRegistry<R = OsRandom, T = SystemClock>
where
    R: RandSource,
    T: TimeSource + Clone,
{
    campaigns: RwLock<HashMap<String, Arc<Campaign>>>,
    generator: CodeGenerator<R, T>,
    time: T,
    code_length: usize,
}

impl Default for CampaignRegistry {
    fn default() -> Self {
        Self::new(MAX_CODE_LENGTH, OsRandom, SystemClock)
    }
}

impl<R, T> CampaignRegistry<R, T>
where
    R: RandSource,
    T: TimeSource + Clone,
{
    /// Creates an empty registry.
    ///
    /// # Parameters
    /// - `code_length`: length of every generated coupon code, clamped like
    ///   [`CodeGenerator::generate`] does.
    /// - `rand`: randomness for coupon code bodies.
    /// - `time`: clock used for window checks and code prefixes.
    pub fn new(code_length: usize, rand: R, time: T) -> Self {
        Self {
            campaigns: RwLock::new(HashMap::new()),
            generator: CodeGenerator::new(rand, time.clone()),
            time,
            code_length,
        }
    }

    /// Registers a new campaign and generates its `max_coupons` coupons.
    ///
    /// Work is proportional to `max_coupons` and runs on the calling thread
    /// before the registry lock is taken. If two callers race to create the
    /// same identifier, exactly one succeeds; the others get
    /// [`Error::CampaignExists`] and the winner's campaign is left untouched.
    ///
    /// The whole pool stays in memory for the life of the registry, so callers
    /// accepting untrusted input should bound `max_coupons` themselves.
    ///
    /// # Errors
    /// - [`Error::CampaignExists`] if `campaign_id` is already registered.
    /// - [`Error::CodeGeneration`] if the coupon pool could not be generated
    ///   or allocated.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, window), err)
    )]
    pub fn create_campaign(
        &self,
        campaign_id: &str,
        window: CampaignWindow,
        max_coupons: usize,
    ) -> Result<()> {
        if self.campaigns.read().contains_key(campaign_id) {
            return Err(Error::CampaignExists {
                campaign_id: campaign_id.to_string(),
            });
        }

        let campaign = Campaign::generate(
            campaign_id,
            window,
            max_coupons,
            &self.generator,
            self.code_length,
        )?;

        match self.campaigns.write().entry(campaign_id.to_string()) {
            Entry::Occupied(_) => Err(Error::CampaignExists {
                campaign_id: campaign_id.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(campaign));
                #[cfg(feature = "tracing")]
                tracing::info!(
                    starts_at = %window.starts_at_formatted(),
                    expires_at = %window.expires_at_formatted(),
                    "campaign created"
                );
                Ok(())
            }
        }
    }

    /// Issues one coupon from the campaign's pool.
    ///
    /// # Errors
    /// - [`Error::CampaignNotFound`] if no such campaign exists.
    /// - [`Error::CampaignNotActive`] outside the campaign window.
    /// - [`Error::CouponsExhausted`] once every coupon has been issued.
    pub fn publish_coupon(&self, campaign_id: &str) -> Result<Coupon> {
        let campaign = self.campaign(campaign_id)?;
        campaign.issue(self.time.now())
    }

    /// Redeems a previously issued coupon.
    ///
    /// # Errors
    /// - [`Error::CampaignNotFound`] if no such campaign exists.
    /// - [`Error::CouponNotFound`] if the campaign never generated `code`.
    /// - [`Error::CouponNotPublished`] if the coupon was never issued.
    /// - [`Error::CouponAlreadyUsed`] if the coupon was already redeemed.
    /// - [`Error::CouponNotActive`] outside the coupon's validity window.
    pub fn use_coupon(&self, campaign_id: &str, code: &str) -> Result<Coupon> {
        let campaign = self.campaign(campaign_id)?;
        campaign.redeem(code, self.time.now())
    }

    /// Snapshots a campaign, including every coupon code it ever generated.
    ///
    /// # Errors
    /// Returns [`Error::CampaignNotFound`] if no such campaign exists.
    pub fn campaign_info(&self, campaign_id: &str) -> Result<CampaignInfo> {
        Ok(self.campaign(campaign_id)?.info())
    }

    /// Identifiers of every registered campaign, sorted.
    pub fn campaign_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.campaigns.read().keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.campaigns.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.read().is_empty()
    }

    /// Clones the campaign handle out of the map. The registry guard is a
    /// temporary and is dropped before this returns.
    fn campaign(&self, campaign_id: &str) -> Result<Arc<Campaign>> {
        self.campaigns
            .read()
            .get(campaign_id)
            .cloned()
            .ok_or_else(|| Error::CampaignNotFound {
                campaign_id: campaign_id.to_string(),
            })
    }
}

use crate::{CampaignWindow, CodeGenerator, Coupon, Error, RandSource, Result, TimeSource};
use chrono::{DateTime, Local};
use parking_lot::RwLock;
use std::collections::{HashMap, hash_map::Entry};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Number of back-to-back duplicate codes tolerated while generating a pool
/// before campaign creation gives up.
pub const MAX_CONSECUTIVE_COLLISIONS: usize = 32;

/// A time-bounded campaign owning a fixed pool of pre-generated coupons.
///
/// Identity and window are immutable. Everything that changes after creation
/// (the pool of unissued codes and the state of each coupon) lives behind the
/// campaign's own lock, so campaigns never contend with one another.
///
/// Invariant: `unpublished.len() + published coupons == max_coupons`, and the
/// set of coupon codes never changes after creation.
#[derive(Debug)]
pub(crate) struct Campaign {
    id: String,
    window: CampaignWindow,
    max_coupons: usize,
    inventory: RwLock<Inventory>,
}

#[derive(Debug)]
struct Inventory {
    /// Codes not yet issued, withdrawn from the back.
    unpublished: Vec<String>,
    /// Every coupon ever generated for the campaign, by code.
    coupons: HashMap<String, Coupon>,
}

/// Point-in-time snapshot of a campaign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CampaignInfo {
    pub campaign_id: String,
    pub window: CampaignWindow,
    pub max_coupons: usize,
    /// Coupons withdrawn from the pool so far, redeemed or not.
    pub issued: usize,
    pub redeemed: usize,
    /// Every coupon code generated for the campaign, issued or not, sorted.
    pub coupon_codes: Vec<String>,
}

impl CampaignInfo {
    /// Coupons still available for issuance.
    pub fn remaining(&self) -> usize {
        self.max_coupons - self.issued
    }
}

impl Campaign {
    /// Builds a campaign and eagerly generates its whole coupon pool.
    ///
    /// Codes are deduplicated within the campaign only; two campaigns may
    /// share a code. Generation touches no shared state, so callers are free
    /// to run it outside of any lock.
    ///
    /// # Errors
    /// Returns [`Error::CodeGeneration`] if the random source fails, yields
    /// [`MAX_CONSECUTIVE_COLLISIONS`] duplicates in a row, or the pool cannot
    /// be allocated.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(window, generator), err)
    )]
    pub(crate) fn generate<R, T>(
        id: &str,
        window: CampaignWindow,
        max_coupons: usize,
        generator: &CodeGenerator<R, T>,
        code_length: usize,
    ) -> Result<Self>
    where
        R: RandSource,
        T: TimeSource,
    {
        let mut unpublished: Vec<String> = Vec::new();
        let mut coupons: HashMap<String, Coupon> = HashMap::new();
        unpublished
            .try_reserve_exact(max_coupons)
            .and_then(|()| coupons.try_reserve(max_coupons))
            .map_err(|err| Error::CodeGeneration {
                reason: format!("cannot allocate a pool of {max_coupons} coupons: {err}"),
            })?;
        let mut collisions = 0;

        while unpublished.len() < max_coupons {
            let code = generator.generate(code_length)?;
            match coupons.entry(code) {
                Entry::Occupied(_) => {
                    collisions += 1;
                    if collisions >= MAX_CONSECUTIVE_COLLISIONS {
                        return Err(Error::CodeGeneration {
                            reason: format!(
                                "{collisions} consecutive duplicate codes after {} unique codes",
                                unpublished.len()
                            ),
                        });
                    }
                }
                Entry::Vacant(slot) => {
                    collisions = 0;
                    let code = slot.key().clone();
                    slot.insert(Coupon::new(code.clone(), window));
                    unpublished.push(code);
                }
            }
        }

        Ok(Self {
            id: id.to_string(),
            window,
            max_coupons,
            inventory: RwLock::new(Inventory {
                unpublished,
                coupons,
            }),
        })
    }

    /// Withdraws one coupon from the pool and publishes it.
    ///
    /// Withdrawal order is last-in, first-out; every unissued coupon is
    /// equivalent. Withdrawal and publication happen under one exclusive lock
    /// acquisition, so no code is ever handed out twice.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(campaign_id = %self.id), err)
    )]
    pub(crate) fn issue(&self, now: DateTime<Local>) -> Result<Coupon> {
        if !self.window.contains(now) {
            return Err(Error::CampaignNotActive {
                campaign_id: self.id.clone(),
            });
        }

        let mut guard = self.inventory.write();
        let inventory = &mut *guard;

        let Some(code) = inventory.unpublished.last() else {
            #[cfg(feature = "tracing")]
            tracing::warn!(campaign_id = %self.id, "coupon pool exhausted");
            return Err(Error::CouponsExhausted {
                campaign_id: self.id.clone(),
            });
        };
        let coupon = inventory
            .coupons
            .get_mut(code)
            .ok_or_else(|| Error::CouponNotFound { code: code.clone() })?;
        coupon.publish(now)?;
        let issued = coupon.clone();
        inventory.unpublished.pop();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            campaign_id = %self.id,
            remaining = inventory.unpublished.len(),
            "coupon issued"
        );
        Ok(issued)
    }

    /// Marks a previously issued coupon as used.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, now), fields(campaign_id = %self.id), err)
    )]
    pub(crate) fn redeem(&self, code: &str, now: DateTime<Local>) -> Result<Coupon> {
        let mut inventory = self.inventory.write();
        let coupon = inventory
            .coupons
            .get_mut(code)
            .ok_or_else(|| Error::CouponNotFound {
                code: code.to_string(),
            })?;
        coupon.redeem(now)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(campaign_id = %self.id, code, "coupon redeemed");
        Ok(coupon.clone())
    }

    /// Snapshots the campaign under its shared lock, so the snapshot never
    /// straddles an in-flight issuance or redemption.
    pub(crate) fn info(&self) -> CampaignInfo {
        let inventory = self.inventory.read();

        let mut coupon_codes: Vec<String> = inventory.coupons.keys().cloned().collect();
        coupon_codes.sort_unstable();
        let redeemed = inventory.coupons.values().filter(|c| c.is_used()).count();

        CampaignInfo {
            campaign_id: self.id.clone(),
            window: self.window,
            max_coupons: self.max_coupons,
            issued: self.max_coupons - inventory.unpublished.len(),
            redeemed,
            coupon_codes,
        }
    }

    #[cfg(test)]
    pub(crate) fn coupon(&self, code: &str) -> Option<Coupon> {
        self.inventory.read().coupons.get(code).cloned()
    }

    /// Unissued pool size and published coupon count, read under one guard.
    #[cfg(test)]
    pub(crate) fn pool_counts(&self) -> (usize, usize) {
        let inventory = self.inventory.read();
        let published = inventory
            .coupons
            .values()
            .filter(|c| c.is_published())
            .count();
        (inventory.unpublished.len(), published)
    }
}

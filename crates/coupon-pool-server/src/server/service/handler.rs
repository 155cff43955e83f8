//! JSON service implementation for campaign creation and coupon issuance.
//!
//! This module defines [`CouponService`], which sits between the HTTP routes
//! and a shared [`CampaignRegistry`]. It validates request fields that the
//! core library takes as typed values (dates, coupon counts), dispatches to
//! the registry, and renders every outcome as a `success`/`message` body.
//!
//! ## Responsibilities
//!
//! - Validate `CreateCampaign` inputs and enforce the configured per-campaign
//!   coupon limit.
//! - Run campaign creation, which generates the whole coupon pool up front, on
//!   the blocking thread pool so the async runtime keeps serving other
//!   requests.
//! - Report business rejections as `success=false` responses, never as
//!   transport errors.
//! - Track whether the service is accepting traffic for the health endpoint.

use crate::server::{
    config::ServerConfig,
    service::types::{
        CreateCampaignRequest, CreateCampaignResponse, GetCampaignRequest, GetCampaignResponse,
        IssueCouponRequest, IssueCouponResponse, UseCouponRequest, UseCouponResponse,
    },
    telemetry::{
        increment_campaigns_created, increment_coupons_issued, increment_coupons_redeemed,
        increment_rejections, increment_requests, record_campaign_creation,
    },
};
use coupon_pool::{CampaignRegistry, CampaignWindow, Error};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Instant;

/// Rejection reason for requests that fail validation before they reach the
/// registry.
const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
/// Rejection reason for a creation task that panicked or was cancelled.
const INTERNAL: &str = "INTERNAL";

/// Coupon campaign service shared by every route.
///
/// Cloning is cheap: the registry and the serving flag sit behind [`Arc`]s,
/// so every clone observes the same campaigns.
#[derive(Clone)]
pub struct CouponService {
    config: ServerConfig,
    registry: Arc<CampaignRegistry>,
    serving: Arc<AtomicBool>,
}

impl CouponService {
    /// Creates a service over `registry`, marked as serving.
    pub fn new(config: ServerConfig, registry: Arc<CampaignRegistry>) -> Self {
        Self {
            config,
            registry,
            serving: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Whether the service still accepts traffic.
    pub fn is_serving(&self) -> bool {
        self.serving.load(Ordering::Acquire)
    }

    /// Flips the health status to not serving. In-flight requests still
    /// complete.
    pub fn set_not_serving(&self) {
        self.serving.store(false, Ordering::Release);
    }

    /// Creates a campaign and generates its full coupon pool.
    ///
    /// Rejects an empty campaign id, malformed dates, an expiry before the
    /// start, and a `maxCoupon` outside `1..=MAX_COUPONS_PER_CAMPAIGN`. Pool
    /// generation runs on [`tokio::task::spawn_blocking`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, fields(campaign_id = %request.campaign_id, max_coupon = request.max_coupon))
    )]
    pub async fn create_campaign(&self, request: CreateCampaignRequest) -> CreateCampaignResponse {
        const OPERATION: &str = "create_campaign";
        increment_requests(OPERATION);

        let (window, max_coupons) = match self.validate_creation(&request) {
            Ok(parsed) => parsed,
            Err((reason, message)) => {
                reject(OPERATION, reason, &message);
                return CreateCampaignResponse {
                    success: false,
                    message,
                };
            }
        };

        let registry = Arc::clone(&self.registry);
        let campaign_id = request.campaign_id;
        let started = Instant::now();
        let outcome = tokio::task::spawn_blocking(move || {
            registry.create_campaign(&campaign_id, window, max_coupons)
        })
        .await;
        record_campaign_creation(started.elapsed().as_secs_f64() * 1_000.0);

        match outcome {
            Ok(Ok(())) => {
                increment_campaigns_created();
                CreateCampaignResponse {
                    success: true,
                    message: String::new(),
                }
            }
            Ok(Err(err)) => CreateCampaignResponse {
                success: false,
                message: reject_error(OPERATION, &err),
            },
            Err(join_err) => {
                let message = format!("campaign creation did not complete: {join_err}");
                reject(OPERATION, INTERNAL, &message);
                CreateCampaignResponse {
                    success: false,
                    message,
                }
            }
        }
    }

    /// Returns the campaign's window and every generated coupon code.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, fields(campaign_id = %request.campaign_id))
    )]
    pub fn get_campaign(&self, request: GetCampaignRequest) -> GetCampaignResponse {
        const OPERATION: &str = "get_campaign";
        increment_requests(OPERATION);

        match self.registry.campaign_info(&request.campaign_id) {
            Ok(info) => GetCampaignResponse {
                success: true,
                message: String::new(),
                campaign_id: info.campaign_id,
                start_date: info.window.starts_at_formatted(),
                expired_date: info.window.expires_at_formatted(),
                all_coupon_ids: info.coupon_codes,
            },
            Err(err) => GetCampaignResponse {
                success: false,
                message: reject_error(OPERATION, &err),
                campaign_id: request.campaign_id,
                ..Default::default()
            },
        }
    }

    /// Issues the next unissued coupon of the campaign.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, fields(campaign_id = %request.campaign_id))
    )]
    pub fn issue_coupon(&self, request: IssueCouponRequest) -> IssueCouponResponse {
        const OPERATION: &str = "issue_coupon";
        increment_requests(OPERATION);

        match self.registry.publish_coupon(&request.campaign_id) {
            Ok(coupon) => {
                increment_coupons_issued();
                IssueCouponResponse {
                    success: true,
                    message: String::new(),
                    coupon_code: coupon.code().to_owned(),
                }
            }
            Err(err) => IssueCouponResponse {
                success: false,
                message: reject_error(OPERATION, &err),
                coupon_code: String::new(),
            },
        }
    }

    /// Redeems an issued coupon exactly once.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, fields(campaign_id = %request.campaign_id, coupon_code = %request.coupon_code))
    )]
    pub fn use_coupon(&self, request: UseCouponRequest) -> UseCouponResponse {
        const OPERATION: &str = "use_coupon";
        increment_requests(OPERATION);

        match self
            .registry
            .use_coupon(&request.campaign_id, &request.coupon_code)
        {
            Ok(_) => {
                increment_coupons_redeemed();
                UseCouponResponse {
                    success: true,
                    message: String::new(),
                }
            }
            Err(err) => UseCouponResponse {
                success: false,
                message: reject_error(OPERATION, &err),
            },
        }
    }

    fn validate_creation(
        &self,
        request: &CreateCampaignRequest,
    ) -> Result<(CampaignWindow, usize), (&'static str, String)> {
        if request.campaign_id.trim().is_empty() {
            return Err((INVALID_ARGUMENT, "campaignId must not be empty".to_owned()));
        }

        let limit = self.config.max_coupons_per_campaign;
        let max_coupons = usize::try_from(request.max_coupon)
            .ok()
            .filter(|&n| (1..=limit).contains(&n))
            .ok_or_else(|| {
                (
                    INVALID_ARGUMENT,
                    format!(
                        "maxCoupon ({}) must be between 1 and {limit}",
                        request.max_coupon
                    ),
                )
            })?;

        let window = CampaignWindow::from_dates(&request.start_date, &request.expired_date)
            .map_err(|err| (err.code(), err.to_string()))?;

        Ok((window, max_coupons))
    }
}

fn reject_error(operation: &'static str, err: &Error) -> String {
    let message = err.to_string();
    reject(operation, err.code(), &message);
    message
}

fn reject(operation: &'static str, reason: &'static str, _message: &str) {
    increment_rejections(operation, reason);
    #[cfg(feature = "tracing")]
    tracing::warn!(operation, reason, "request rejected: {}", _message);
}

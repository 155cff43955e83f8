//! Wire types for the coupon service.
//!
//! Field names are camelCase on the wire. Every response carries `success`
//! and `message`; clients branch on `success`, never on the HTTP status.
//!
//! Missing request fields decode to their default (empty string, zero) so
//! that validation, not the JSON layer, reports them, and the client always
//! gets a `success=false` body back.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    #[serde(default)]
    pub campaign_id: String,
    /// `YYYY-MM-DD`; the campaign opens at 00:00:00 local time.
    #[serde(default)]
    pub start_date: String,
    /// `YYYY-MM-DD`; the campaign closes at 23:59:59 local time.
    #[serde(default)]
    pub expired_date: String,
    #[serde(default)]
    pub max_coupon: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCampaignRequest {
    #[serde(default)]
    pub campaign_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCampaignResponse {
    pub success: bool,
    pub message: String,
    pub campaign_id: String,
    /// `YYYY-MM-DD HH:MM:SS`, empty on failure.
    pub start_date: String,
    /// `YYYY-MM-DD HH:MM:SS`, empty on failure.
    pub expired_date: String,
    /// Every coupon code generated for the campaign, issued or not.
    pub all_coupon_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCouponRequest {
    #[serde(default)]
    pub campaign_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCouponResponse {
    pub success: bool,
    pub message: String,
    /// Empty when `success` is false.
    pub coupon_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCouponRequest {
    #[serde(default)]
    pub campaign_id: String,
    #[serde(default)]
    pub coupon_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCouponResponse {
    pub success: bool,
    pub message: String,
}

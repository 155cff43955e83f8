//! HTTP routing for the coupon service.
//!
//! Each operation is a `POST` with a JSON body at a path named after its
//! service and method. Business failures come back as `200 OK` with
//! `success=false`; only a body that is not valid JSON is rejected by the
//! extractor itself.

use crate::server::service::{
    handler::CouponService,
    types::{
        CreateCampaignRequest, CreateCampaignResponse, GetCampaignRequest, GetCampaignResponse,
        IssueCouponRequest, IssueCouponResponse, UseCouponRequest, UseCouponResponse,
    },
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub const CREATE_CAMPAIGN: &str = "/coupon.v1.CampaignService/CreateCampaign";
pub const GET_CAMPAIGN: &str = "/coupon.v1.CampaignService/GetCampaign";
pub const ISSUE_COUPON: &str = "/coupon.v1.CouponService/IssueCoupon";
pub const USE_COUPON: &str = "/coupon.v1.CouponService/UseCoupon";
pub const HEALTH: &str = "/health";

/// Builds the application router over a shared [`CouponService`].
pub fn router(service: CouponService) -> Router {
    Router::new()
        .route(CREATE_CAMPAIGN, post(create_campaign))
        .route(GET_CAMPAIGN, post(get_campaign))
        .route(ISSUE_COUPON, post(issue_coupon))
        .route(USE_COUPON, post(use_coupon))
        .route(HEALTH, get(health))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(service)
}

async fn create_campaign(
    State(service): State<CouponService>,
    Json(request): Json<CreateCampaignRequest>,
) -> Json<CreateCampaignResponse> {
    Json(service.create_campaign(request).await)
}

async fn get_campaign(
    State(service): State<CouponService>,
    Json(request): Json<GetCampaignRequest>,
) -> Json<GetCampaignResponse> {
    Json(service.get_campaign(request))
}

async fn issue_coupon(
    State(service): State<CouponService>,
    Json(request): Json<IssueCouponRequest>,
) -> Json<IssueCouponResponse> {
    Json(service.issue_coupon(request))
}

async fn use_coupon(
    State(service): State<CouponService>,
    Json(request): Json<UseCouponRequest>,
) -> Json<UseCouponResponse> {
    Json(service.use_coupon(request))
}

async fn health(State(service): State<CouponService>) -> (StatusCode, &'static str) {
    if service.is_serving() {
        (StatusCode::OK, "SERVING")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT_SERVING")
    }
}

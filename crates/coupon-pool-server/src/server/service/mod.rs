//! Request handling between the HTTP routes and the campaign registry.
//!
//! ## Structure
//!
//! - [`types`] - JSON request/response bodies, one pair per operation.
//! - [`handler`] - [`CouponService`](handler::CouponService), which validates
//!   requests, calls into `coupon-pool` and renders every business failure as
//!   a `success=false` response.

pub mod handler;
pub mod types;

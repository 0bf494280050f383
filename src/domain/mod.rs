//! Transport-agnostic domain: entities, lifecycle services, and ports.

pub mod code;
mod coupon;
mod error;
mod offer;
pub mod ports;
mod service;

pub use coupon::{Coupon, CouponStatus, NewCoupon};
pub use error::{Error, ErrorCode};
pub use offer::{NewOffer, Offer};
pub use service::{CouponService, OfferService};

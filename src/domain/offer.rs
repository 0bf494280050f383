//! Offers: operator-published promotions that coupons are issued from.

use chrono::{DateTime, NaiveDate, Utc};

/// A published promotion. Offers are append-only: once created they are never
/// mutated or deleted, and claiming one does not consume it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    pub id: i32,
    pub restaurant: String,
    pub description: String,
    /// Calendar date after which issued coupons stop being redeemable. The
    /// date is caller-supplied and deliberately not checked against "today":
    /// an offer may be created already expired.
    pub expires: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating an offer. Field validation (non-empty text, parseable
/// date) happens at the inbound boundary before this type is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOffer {
    pub restaurant: String,
    pub description: String,
    pub expires: NaiveDate,
}

//! Coupon codes and their derived lifecycle state.
//!
//! A coupon has two stored facts (its expiry date and its redemption
//! timestamp) and three logical states. "Expired" is never stored; it is
//! computed from the current date at read time.

use chrono::{DateTime, NaiveDate, Utc};

use super::Offer;

/// A single-use coupon issued from an offer.
///
/// The restaurant, description, and expiry are snapshotted from the offer at
/// issuance so later offer edits cannot retroactively change issued coupons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coupon {
    pub id: i32,
    /// Weak back-reference to the originating offer, kept for lookups only.
    pub offer_id: Option<i32>,
    pub restaurant: String,
    pub description: String,
    /// Globally unique `PREFIX-TOKEN` code.
    pub code: String,
    pub expires: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub redeemed_by: Option<String>,
}

/// Logical lifecycle state of a coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponStatus {
    /// Not redeemed and not past its expiry date.
    Active,
    /// Not redeemed, but the expiry date has passed. Derived, never stored.
    Expired,
    /// Redeemed. Terminal; there is no un-redeem.
    Redeemed,
}

impl Coupon {
    /// A coupon is expired iff `today` is strictly after its expiry date.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        today > self.expires
    }

    /// A coupon is redeemed iff its redemption timestamp is set.
    pub fn is_redeemed(&self) -> bool {
        self.redeemed_at.is_some()
    }

    /// Derive the lifecycle state for the given date. Redemption is terminal,
    /// so a redeemed coupon reports [`CouponStatus::Redeemed`] even past its
    /// expiry date.
    pub fn status(&self, today: NaiveDate) -> CouponStatus {
        if self.is_redeemed() {
            CouponStatus::Redeemed
        } else if self.is_expired(today) {
            CouponStatus::Expired
        } else {
            CouponStatus::Active
        }
    }
}

/// Payload for persisting a freshly issued coupon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoupon {
    pub offer_id: Option<i32>,
    pub restaurant: String,
    pub description: String,
    pub code: String,
    pub expires: NaiveDate,
}

impl NewCoupon {
    /// Snapshot the offer's fields into a new coupon carrying `code`.
    pub fn from_offer(offer: &Offer, code: String) -> Self {
        Self {
            offer_id: Some(offer.id),
            restaurant: offer.restaurant.clone(),
            description: offer.description.clone(),
            code,
            expires: offer.expires,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn coupon(expires: NaiveDate, redeemed_at: Option<DateTime<Utc>>) -> Coupon {
        Coupon {
            id: 1,
            offer_id: Some(7),
            restaurant: "Chipotle".into(),
            description: "Free chips".into(),
            code: "CHIP-ABCDEFGH12".into(),
            expires,
            created_at: Utc::now(),
            redeemed_at,
            redeemed_by: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[rstest]
    fn coupon_is_active_on_its_expiry_date() {
        let c = coupon(date(2025, 11, 5), None);
        assert!(!c.is_expired(date(2025, 11, 5)));
        assert_eq!(c.status(date(2025, 11, 5)), CouponStatus::Active);
    }

    #[rstest]
    fn coupon_expires_the_day_after() {
        let c = coupon(date(2025, 11, 5), None);
        assert!(c.is_expired(date(2025, 11, 6)));
        assert_eq!(c.status(date(2025, 11, 6)), CouponStatus::Expired);
    }

    #[rstest]
    fn redemption_is_terminal_even_past_expiry() {
        let c = coupon(date(2025, 11, 5), Some(Utc::now()));
        assert!(c.is_redeemed());
        assert_eq!(c.status(date(2026, 1, 1)), CouponStatus::Redeemed);
    }

    #[rstest]
    fn from_offer_snapshots_offer_fields() {
        let offer = Offer {
            id: 42,
            restaurant: "Chipotle".into(),
            description: "Free chips".into(),
            expires: date(2025, 11, 5),
            created_at: Utc::now(),
        };
        let new = NewCoupon::from_offer(&offer, "CHIP-XYZ".into());
        assert_eq!(new.offer_id, Some(42));
        assert_eq!(new.restaurant, "Chipotle");
        assert_eq!(new.description, "Free chips");
        assert_eq!(new.expires, offer.expires);
        assert_eq!(new.code, "CHIP-XYZ");
    }
}

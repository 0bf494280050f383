//! Domain services implementing the driving ports.
//!
//! [`OfferService`] is a thin pass-through to offer storage. [`CouponService`]
//! owns the only real logic in the system: issuing a uniquely-coded coupon
//! from an offer and redeeming it exactly once.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use super::code;
use super::ports::{
    CouponLifecycle, CouponRepository, OfferCatalogue, OfferRepository, RepositoryError,
};
use super::{Coupon, Error, NewCoupon, NewOffer, Offer};

/// Issuance retries before giving up on finding an unused code. The original
/// system silently fell through to a null code after this many collisions;
/// here exhausting the budget is a hard error.
const MAX_CODE_ATTEMPTS: u32 = 10;

/// Offer catalogue backed by an [`OfferRepository`].
#[derive(Clone)]
pub struct OfferService {
    offers: Arc<dyn OfferRepository>,
}

impl OfferService {
    pub fn new(offers: Arc<dyn OfferRepository>) -> Self {
        Self { offers }
    }
}

#[async_trait]
impl OfferCatalogue for OfferService {
    async fn create(&self, offer: NewOffer) -> Result<Offer, Error> {
        let created = self.offers.insert(offer).await?;
        debug!(offer_id = created.id, restaurant = %created.restaurant, "offer created");
        Ok(created)
    }

    async fn list(&self, filter: Option<&str>) -> Result<Vec<Offer>, Error> {
        Ok(self.offers.list(filter).await?)
    }

    async fn find(&self, id: i32) -> Result<Option<Offer>, Error> {
        Ok(self.offers.find(id).await?)
    }
}

/// Coupon lifecycle service backed by offer and coupon storage.
#[derive(Clone)]
pub struct CouponService {
    offers: Arc<dyn OfferRepository>,
    coupons: Arc<dyn CouponRepository>,
}

impl CouponService {
    pub fn new(offers: Arc<dyn OfferRepository>, coupons: Arc<dyn CouponRepository>) -> Self {
        Self { offers, coupons }
    }
}

#[async_trait]
impl CouponLifecycle for CouponService {
    /// Issue a coupon from an offer.
    ///
    /// Offers model unlimited-use promotions: issuing never marks or consumes
    /// the offer, so any number of coupons may be issued from one offer. Code
    /// uniqueness rests on the storage constraint; a duplicate insert triggers
    /// regeneration, bounded by [`MAX_CODE_ATTEMPTS`].
    async fn issue(&self, offer_id: i32) -> Result<Coupon, Error> {
        let offer = self
            .offers
            .find(offer_id)
            .await?
            .ok_or_else(|| Error::not_found("offer not found"))?;

        let prefix = code::prefix_for(&offer.restaurant);
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let candidate = code::generate(&prefix, code::TOKEN_LENGTH);
            match self
                .coupons
                .insert(NewCoupon::from_offer(&offer, candidate))
                .await
            {
                Ok(coupon) => {
                    debug!(offer_id, code = %coupon.code, "coupon issued");
                    return Ok(coupon);
                }
                Err(RepositoryError::DuplicateCode) => {
                    warn!(offer_id, attempt, "coupon code collision, regenerating");
                }
                Err(other) => return Err(other.into()),
            }
        }
        Err(Error::internal("could not allocate a unique coupon code"))
    }

    async fn lookup(&self, code: &str) -> Result<Coupon, Error> {
        self.coupons
            .find_by_code(code)
            .await?
            .ok_or_else(|| Error::not_found("code not found"))
    }

    /// Redeem a coupon. Precondition checks run in order, first failure wins:
    /// blank code, unknown code, expired, already redeemed. The write itself
    /// is conditional on the coupon being un-redeemed, so two concurrent
    /// redemptions can never both succeed.
    async fn redeem(&self, code: &str, redeemed_by: Option<&str>) -> Result<Coupon, Error> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(Error::invalid_request("missing code"));
        }

        let coupon = self
            .coupons
            .find_by_code(&code)
            .await?
            .ok_or_else(|| Error::not_found("code not found"))?;

        let today = Utc::now().date_naive();
        if coupon.is_expired(today) {
            return Err(Error::gone("expired"));
        }
        if coupon.is_redeemed() {
            return Err(Error::conflict("already redeemed"));
        }

        let redeemed_by = redeemed_by.map(str::trim).filter(|name| !name.is_empty());
        let updated = self
            .coupons
            .mark_redeemed(&code, Utc::now(), redeemed_by)
            .await?;
        if updated == 0 {
            // The conditional update lost a race; re-read to classify.
            return match self.coupons.find_by_code(&code).await? {
                Some(current) if current.is_redeemed() => Err(Error::conflict("already redeemed")),
                Some(_) => Err(Error::internal("redemption update did not apply")),
                None => Err(Error::not_found("code not found")),
            };
        }

        self.coupons
            .find_by_code(&code)
            .await?
            .ok_or_else(|| Error::internal("redeemed coupon disappeared"))
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Coupon>, Error> {
        Ok(self.coupons.recent(limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{InMemoryCouponRepository, InMemoryOfferRepository};
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    struct Fixture {
        offers: Arc<InMemoryOfferRepository>,
        offer_service: OfferService,
        coupon_service: CouponService,
    }

    #[fixture]
    fn service() -> Fixture {
        let offers = Arc::new(InMemoryOfferRepository::default());
        let coupons = Arc::new(InMemoryCouponRepository::default());
        Fixture {
            offers: offers.clone(),
            offer_service: OfferService::new(offers.clone()),
            coupon_service: CouponService::new(offers, coupons),
        }
    }

    fn offer(expires: NaiveDate) -> NewOffer {
        NewOffer {
            restaurant: "Chipotle".into(),
            description: "Free chips".into(),
            expires,
        }
    }

    fn future_date() -> NaiveDate {
        Utc::now().date_naive() + chrono::Days::new(30)
    }

    fn past_date() -> NaiveDate {
        Utc::now().date_naive() - chrono::Days::new(30)
    }

    #[rstest]
    #[tokio::test]
    async fn issue_snapshots_offer_fields(service: Fixture) {
        let created = service
            .offer_service
            .create(offer(future_date()))
            .await
            .expect("create offer");

        let coupon = service
            .coupon_service
            .issue(created.id)
            .await
            .expect("issue coupon");

        assert_eq!(coupon.restaurant, "Chipotle");
        assert_eq!(coupon.description, "Free chips");
        assert_eq!(coupon.expires, created.expires);
        assert_eq!(coupon.offer_id, Some(created.id));
        assert!(coupon.code.starts_with("CHIP-"));
    }

    #[rstest]
    #[tokio::test]
    async fn issue_unknown_offer_is_not_found(service: Fixture) {
        let err = service
            .coupon_service
            .issue(999)
            .await
            .expect_err("missing offer");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert!(
            service
                .coupon_service
                .recent(25)
                .await
                .expect("recent")
                .is_empty(),
            "no coupon row may be created for a missing offer"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn issued_codes_are_unique(service: Fixture) {
        let created = service
            .offer_service
            .create(offer(future_date()))
            .await
            .expect("create offer");

        let mut codes = Vec::new();
        for _ in 0..20 {
            let coupon = service
                .coupon_service
                .issue(created.id)
                .await
                .expect("issue coupon");
            codes.push(coupon.code);
        }
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 20);
    }

    #[rstest]
    #[tokio::test]
    async fn redeem_succeeds_once_then_conflicts(service: Fixture) {
        let created = service
            .offer_service
            .create(offer(future_date()))
            .await
            .expect("create offer");
        let coupon = service
            .coupon_service
            .issue(created.id)
            .await
            .expect("issue coupon");

        let redeemed = service
            .coupon_service
            .redeem(&coupon.code, Some("Alice"))
            .await
            .expect("first redemption");
        assert!(redeemed.is_redeemed());
        assert_eq!(redeemed.redeemed_by.as_deref(), Some("Alice"));

        let err = service
            .coupon_service
            .redeem(&coupon.code, Some("Bob"))
            .await
            .expect_err("second redemption");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn redeem_normalises_code_case_and_whitespace(service: Fixture) {
        let created = service
            .offer_service
            .create(offer(future_date()))
            .await
            .expect("create offer");
        let coupon = service
            .coupon_service
            .issue(created.id)
            .await
            .expect("issue coupon");

        let sloppy = format!("  {}  ", coupon.code.to_lowercase());
        let redeemed = service
            .coupon_service
            .redeem(&sloppy, None)
            .await
            .expect("redemption with sloppy input");
        assert_eq!(redeemed.code, coupon.code);
        assert_eq!(redeemed.redeemed_by, None);
    }

    #[rstest]
    #[tokio::test]
    async fn redeem_blank_code_is_invalid(service: Fixture) {
        let err = service
            .coupon_service
            .redeem("   ", None)
            .await
            .expect_err("blank code");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn redeem_unknown_code_is_not_found(service: Fixture) {
        let err = service
            .coupon_service
            .redeem("NOPE-0000000000", None)
            .await
            .expect_err("unknown code");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn redeem_expired_coupon_is_gone(service: Fixture) {
        let created = service
            .offer_service
            .create(offer(past_date()))
            .await
            .expect("create offer");
        let coupon = service
            .coupon_service
            .issue(created.id)
            .await
            .expect("issuing from an expired offer is allowed");

        let err = service
            .coupon_service
            .redeem(&coupon.code, Some("Alice"))
            .await
            .expect_err("expired redemption");
        assert_eq!(err.code(), ErrorCode::Gone);
    }

    #[rstest]
    #[tokio::test]
    async fn redeem_blank_redeemer_name_is_dropped(service: Fixture) {
        let created = service
            .offer_service
            .create(offer(future_date()))
            .await
            .expect("create offer");
        let coupon = service
            .coupon_service
            .issue(created.id)
            .await
            .expect("issue coupon");

        let redeemed = service
            .coupon_service
            .redeem(&coupon.code, Some("   "))
            .await
            .expect("redemption");
        assert_eq!(redeemed.redeemed_by, None);
    }

    #[rstest]
    #[tokio::test]
    async fn offers_never_deplete(service: Fixture) {
        let created = service
            .offer_service
            .create(offer(future_date()))
            .await
            .expect("create offer");

        for _ in 0..5 {
            service
                .coupon_service
                .issue(created.id)
                .await
                .expect("offers are unlimited-use");
        }
        assert_eq!(service.offers.count().await.expect("count"), 1);
    }
}

//! Domain ports.
//!
//! Driving ports ([`OfferCatalogue`], [`CouponLifecycle`]) are the use-case
//! traits inbound adapters call. Driven ports ([`OfferRepository`],
//! [`CouponRepository`], [`QrEncoder`]) are implemented by outbound adapters.
//! In-memory repositories live here too so service tests and doctests run
//! without a database.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Coupon, Error, NewCoupon, NewOffer, Offer};

/// Errors surfaced by repository implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// Failed to obtain a storage connection.
    #[error("failed to get storage connection: {message}")]
    Connection { message: String },

    /// A query or write failed.
    #[error("storage operation failed: {message}")]
    Query { message: String },

    /// An insert violated the unique constraint on the coupon code column.
    #[error("coupon code already exists")]
    DuplicateCode,
}

impl RepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<RepositoryError> for Error {
    fn from(value: RepositoryError) -> Self {
        Error::internal(value.to_string())
    }
}

/// Driving port for the offer catalogue.
#[async_trait]
pub trait OfferCatalogue: Send + Sync {
    /// Persist a new offer and return it with its assigned identifier.
    async fn create(&self, offer: NewOffer) -> Result<Offer, Error>;

    /// List offers, newest first, optionally filtered by a case-insensitive
    /// substring match on the restaurant name.
    async fn list(&self, filter: Option<&str>) -> Result<Vec<Offer>, Error>;

    /// Find an offer by identifier.
    async fn find(&self, id: i32) -> Result<Option<Offer>, Error>;
}

/// Driving port for issuing, looking up, and redeeming coupons.
#[async_trait]
pub trait CouponLifecycle: Send + Sync {
    /// Issue a new coupon from the given offer.
    async fn issue(&self, offer_id: i32) -> Result<Coupon, Error>;

    /// Exact-match lookup by code.
    async fn lookup(&self, code: &str) -> Result<Coupon, Error>;

    /// Redeem a coupon once. See the service for the precondition ordering.
    async fn redeem(&self, code: &str, redeemed_by: Option<&str>) -> Result<Coupon, Error>;

    /// Most recently issued coupons, newest first.
    async fn recent(&self, limit: i64) -> Result<Vec<Coupon>, Error>;
}

/// Driven port for offer storage.
#[async_trait]
pub trait OfferRepository: Send + Sync {
    async fn insert(&self, offer: NewOffer) -> Result<Offer, RepositoryError>;
    async fn list(&self, filter: Option<&str>) -> Result<Vec<Offer>, RepositoryError>;
    async fn find(&self, id: i32) -> Result<Option<Offer>, RepositoryError>;
    async fn count(&self) -> Result<i64, RepositoryError>;
}

/// Driven port for coupon storage.
#[async_trait]
pub trait CouponRepository: Send + Sync {
    /// Insert a coupon. Fails with [`RepositoryError::DuplicateCode`] when the
    /// code is already taken; the unique constraint is the sole arbiter.
    async fn insert(&self, coupon: NewCoupon) -> Result<Coupon, RepositoryError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError>;

    async fn recent(&self, limit: i64) -> Result<Vec<Coupon>, RepositoryError>;

    /// Conditionally set the redemption fields on an un-redeemed coupon.
    /// Returns the number of rows updated: 0 means another redemption won the
    /// race (or the code vanished), 1 means this call redeemed the coupon.
    async fn mark_redeemed(
        &self,
        code: &str,
        redeemed_at: DateTime<Utc>,
        redeemed_by: Option<&str>,
    ) -> Result<u64, RepositoryError>;
}

/// Driven port for rendering a coupon code as a scannable image.
pub trait QrEncoder: Send + Sync {
    /// Encode `text` as a QR symbol and return PNG bytes.
    fn encode_png(&self, text: &str) -> Result<Vec<u8>, Error>;
}

/// In-memory offer repository for tests.
#[derive(Debug, Default)]
pub struct InMemoryOfferRepository {
    offers: Mutex<Vec<Offer>>,
}

#[async_trait]
impl OfferRepository for InMemoryOfferRepository {
    async fn insert(&self, offer: NewOffer) -> Result<Offer, RepositoryError> {
        let mut offers = self.offers.lock().expect("offer store poisoned");
        let id = i32::try_from(offers.len()).map_err(|_| RepositoryError::query("id overflow"))? + 1;
        let stored = Offer {
            id,
            restaurant: offer.restaurant,
            description: offer.description,
            expires: offer.expires,
            created_at: Utc::now(),
        };
        offers.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self, filter: Option<&str>) -> Result<Vec<Offer>, RepositoryError> {
        let offers = self.offers.lock().expect("offer store poisoned");
        let needle = filter.map(str::to_lowercase);
        let mut matched: Vec<Offer> = offers
            .iter()
            .filter(|offer| match &needle {
                Some(needle) => offer.restaurant.to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }

    async fn find(&self, id: i32) -> Result<Option<Offer>, RepositoryError> {
        let offers = self.offers.lock().expect("offer store poisoned");
        Ok(offers.iter().find(|offer| offer.id == id).cloned())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let offers = self.offers.lock().expect("offer store poisoned");
        Ok(offers.len() as i64)
    }
}

/// In-memory coupon repository for tests. Enforces code uniqueness and the
/// conditional redemption update the way the SQLite adapter does.
#[derive(Debug, Default)]
pub struct InMemoryCouponRepository {
    coupons: Mutex<Vec<Coupon>>,
}

#[async_trait]
impl CouponRepository for InMemoryCouponRepository {
    async fn insert(&self, coupon: NewCoupon) -> Result<Coupon, RepositoryError> {
        let mut coupons = self.coupons.lock().expect("coupon store poisoned");
        if coupons.iter().any(|existing| existing.code == coupon.code) {
            return Err(RepositoryError::DuplicateCode);
        }
        let id =
            i32::try_from(coupons.len()).map_err(|_| RepositoryError::query("id overflow"))? + 1;
        let stored = Coupon {
            id,
            offer_id: coupon.offer_id,
            restaurant: coupon.restaurant,
            description: coupon.description,
            code: coupon.code,
            expires: coupon.expires,
            created_at: Utc::now(),
            redeemed_at: None,
            redeemed_by: None,
        };
        coupons.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError> {
        let coupons = self.coupons.lock().expect("coupon store poisoned");
        Ok(coupons.iter().find(|coupon| coupon.code == code).cloned())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Coupon>, RepositoryError> {
        let coupons = self.coupons.lock().expect("coupon store poisoned");
        let mut sorted: Vec<Coupon> = coupons.clone();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(sorted)
    }

    async fn mark_redeemed(
        &self,
        code: &str,
        redeemed_at: DateTime<Utc>,
        redeemed_by: Option<&str>,
    ) -> Result<u64, RepositoryError> {
        let mut coupons = self.coupons.lock().expect("coupon store poisoned");
        match coupons
            .iter_mut()
            .find(|coupon| coupon.code == code && coupon.redeemed_at.is_none())
        {
            Some(coupon) => {
                coupon.redeemed_at = Some(redeemed_at);
                if let Some(by) = redeemed_by {
                    coupon.redeemed_by = Some(by.to_owned());
                }
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

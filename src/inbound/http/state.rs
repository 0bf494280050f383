//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on domain ports and remain testable without real infrastructure.

use std::sync::Arc;

use crate::domain::ports::{CouponLifecycle, OfferCatalogue, QrEncoder};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub offers: Arc<dyn OfferCatalogue>,
    pub coupons: Arc<dyn CouponLifecycle>,
    pub qr: Arc<dyn QrEncoder>,
}

impl HttpState {
    /// Construct state from port implementations.
    pub fn new(
        offers: Arc<dyn OfferCatalogue>,
        coupons: Arc<dyn CouponLifecycle>,
        qr: Arc<dyn QrEncoder>,
    ) -> Self {
        Self {
            offers,
            coupons,
            qr,
        }
    }
}

//! Server construction: state wiring and app assembly.

mod config;

pub use config::Cli;

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{CouponRepository, OfferRepository};
use crate::domain::{CouponService, OfferService};
use crate::inbound::http::coupons::{claim, coupon_qr, redeem, view_coupon};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::offers::{create_offer, create_offer_form, home, search};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{DbPool, DieselCouponRepository, DieselOfferRepository};
use crate::outbound::qr::PngQrEncoder;

/// Wire the domain services and outbound adapters into handler state.
pub fn build_state(pool: DbPool) -> HttpState {
    let offer_repo: Arc<dyn OfferRepository> = Arc::new(DieselOfferRepository::new(pool.clone()));
    let coupon_repo: Arc<dyn CouponRepository> = Arc::new(DieselCouponRepository::new(pool));

    HttpState::new(
        Arc::new(OfferService::new(offer_repo.clone())),
        Arc::new(CouponService::new(offer_repo, coupon_repo)),
        Arc::new(PngQrEncoder),
    )
}

/// Assemble the actix application. Kept separate from `main` so integration
/// tests can drive the full routing table through `actix_web::test`.
pub fn build_app(
    state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody<Error = impl std::fmt::Debug>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(state)
        .app_data(health_state)
        .service(home)
        .service(search)
        .service(create_offer_form)
        .service(create_offer)
        .service(claim)
        .service(coupon_qr)
        .service(view_coupon)
        .service(redeem)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

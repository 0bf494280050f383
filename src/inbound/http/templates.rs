//! Askama page templates and the shared render helper.

use actix_web::{HttpResponse, http::header::ContentType};
use askama::Template;
use tracing::error;

use crate::domain::{Coupon, Error, Offer};

use super::error::ApiResult;

/// Home page: offers (optionally filtered) plus recently issued coupons.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub offers: Vec<Offer>,
    pub recent: Vec<Coupon>,
    pub search_term: String,
}

/// Dedicated search results page.
#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchPage {
    pub offers: Vec<Offer>,
    pub search_term: String,
}

/// Offer creation form, optionally prefilled with a restaurant name.
#[derive(Template)]
#[template(path = "create_offer.html")]
pub struct CreateOfferPage {
    pub restaurant: String,
}

/// Coupon detail page with the QR image and redemption form.
#[derive(Template)]
#[template(path = "view_coupon.html")]
pub struct CouponPage {
    pub coupon: Coupon,
}

/// Render a template into an HTML response.
pub(crate) fn render<T: Template>(page: &T) -> ApiResult<HttpResponse> {
    let body = page.render().map_err(|err| {
        error!(error = %err, "template rendering failed");
        Error::internal("template rendering failed")
    })?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}

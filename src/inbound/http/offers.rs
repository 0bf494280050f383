//! Offer HTTP handlers: home listing, search, and offer creation.

use actix_web::{HttpResponse, get, http::header, post, web};
use serde::Deserialize;

use crate::domain::NewOffer;

use super::error::ApiResult;
use super::state::HttpState;
use super::templates::{CreateOfferPage, HomePage, SearchPage, render};
use super::validation::{parse_expiry_date, required_field};

/// Coupons shown in the "recently generated" list on the home page.
const RECENT_COUPON_LIMIT: i64 = 25;

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    restaurants: Option<String>,
}

/// Home page: all offers, or those matching the `restaurants` search term,
/// plus the most recently issued coupons.
#[get("/")]
pub async fn home(
    state: web::Data<HttpState>,
    query: web::Query<HomeQuery>,
) -> ApiResult<HttpResponse> {
    let search_term = query
        .restaurants
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_owned();
    let filter = (!search_term.is_empty()).then_some(search_term.as_str());

    let offers = state.offers.list(filter).await?;
    let recent = state.coupons.recent(RECENT_COUPON_LIMIT).await?;

    render(&HomePage {
        offers,
        recent,
        search_term,
    })
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    restaurant: Option<String>,
}

/// Search results page. An empty result set still renders, with a link to
/// create an offer prefilled with the search term.
#[get("/search")]
pub async fn search(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<HttpResponse> {
    let search_term = query
        .restaurant
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_owned();
    let offers = if search_term.is_empty() {
        Vec::new()
    } else {
        state.offers.list(Some(&search_term)).await?
    };

    render(&SearchPage {
        offers,
        search_term,
    })
}

#[derive(Debug, Deserialize)]
pub struct CreateOfferPrefill {
    restaurant: Option<String>,
}

/// Offer creation form, optionally prefilled from a failed search.
#[get("/create_offer")]
pub async fn create_offer_form(query: web::Query<CreateOfferPrefill>) -> ApiResult<HttpResponse> {
    render(&CreateOfferPage {
        restaurant: query.restaurant.clone().unwrap_or_default(),
    })
}

#[derive(Debug, Deserialize)]
pub struct CreateOfferForm {
    restaurant: Option<String>,
    description: Option<String>,
    expires: Option<String>,
}

/// Create an offer from the submitted form and redirect to the home page.
/// All fields are required; the expiry date must be `YYYY-MM-DD` and is
/// deliberately not checked against today.
#[post("/create_offer")]
pub async fn create_offer(
    state: web::Data<HttpState>,
    form: web::Form<CreateOfferForm>,
) -> ApiResult<HttpResponse> {
    let restaurant = required_field(form.restaurant.as_deref(), "restaurant")?;
    let description = required_field(form.description.as_deref(), "description")?;
    let expires = parse_expiry_date(&required_field(form.expires.as_deref(), "expires")?)?;

    state
        .offers
        .create(NewOffer {
            restaurant,
            description,
            expires,
        })
        .await?;

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish())
}

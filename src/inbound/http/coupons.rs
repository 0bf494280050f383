//! Coupon HTTP handlers: claim, detail page, QR image, and redemption.

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::ApiResult;
use super::state::HttpState;
use super::templates::{CouponPage, render};

/// Response payload for a successful claim.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClaimResponse {
    pub ok: bool,
    /// The freshly issued coupon code.
    #[schema(example = "CHIP-7Q4ZK9M2XA")]
    pub code: String,
    /// Absolute URL of the coupon detail page.
    pub view_url: String,
    /// Absolute URL of the coupon's QR image.
    pub qr_url: String,
    /// Expiry date in `YYYY-MM-DD` form.
    #[schema(example = "2025-11-05")]
    pub expires: String,
}

/// Claim an offer, issuing a new single-use coupon.
///
/// Offers are unlimited-use promotions: claiming never consumes the offer,
/// and every claim yields an independent coupon.
#[utoipa::path(
    post,
    path = "/claim/{offer_id}",
    params(("offer_id" = i32, Path, description = "Offer to claim")),
    responses(
        (status = 200, description = "Coupon issued", body = ClaimResponse),
        (status = 404, description = "Offer not found"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["coupons"],
    operation_id = "claimOffer"
)]
#[post("/claim/{offer_id}")]
pub async fn claim(
    req: HttpRequest,
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let coupon = state.coupons.issue(path.into_inner()).await?;

    let info = req.connection_info();
    let base = format!("{}://{}", info.scheme(), info.host());
    Ok(HttpResponse::Ok().json(ClaimResponse {
        ok: true,
        view_url: format!("{base}/coupon/{}", coupon.code),
        qr_url: format!("{base}/coupon/{}/qr.png", coupon.code),
        expires: coupon.expires.to_string(),
        code: coupon.code,
    }))
}

/// Coupon detail page.
#[get("/coupon/{code}")]
pub async fn view_coupon(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let coupon = state.coupons.lookup(&path).await?;
    render(&CouponPage { coupon })
}

/// QR image for a coupon code.
#[get("/coupon/{code}/qr.png")]
pub async fn coupon_qr(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let coupon = state.coupons.lookup(&path).await?;
    let png = state.qr.encode_png(&coupon.code)?;
    Ok(HttpResponse::Ok().content_type("image/png").body(png))
}

/// Form payload for redemption.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RedeemForm {
    pub code: Option<String>,
    pub redeemed_by: Option<String>,
}

/// Response payload for a successful redemption.
#[derive(Debug, Serialize, ToSchema)]
pub struct RedeemResponse {
    pub ok: bool,
    pub code: String,
}

/// Redeem a coupon exactly once.
#[utoipa::path(
    post,
    path = "/redeem",
    request_body(
        content = RedeemForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Coupon redeemed", body = RedeemResponse),
        (status = 400, description = "Missing code"),
        (status = 404, description = "Code not found"),
        (status = 409, description = "Already redeemed"),
        (status = 410, description = "Expired")
    ),
    tags = ["coupons"],
    operation_id = "redeemCoupon"
)]
#[post("/redeem")]
pub async fn redeem(
    state: web::Data<HttpState>,
    form: web::Form<RedeemForm>,
) -> ApiResult<HttpResponse> {
    let coupon = state
        .coupons
        .redeem(
            form.code.as_deref().unwrap_or_default(),
            form.redeemed_by.as_deref(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(RedeemResponse {
        ok: true,
        code: coupon.code,
    }))
}

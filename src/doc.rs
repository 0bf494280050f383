//! OpenAPI surface for the JSON endpoints.
//!
//! The HTML pages are not documented here; only the machine-facing claim,
//! redeem, and health endpoints carry schemas.

use utoipa::OpenApi;

use crate::domain::ErrorCode;
use crate::inbound::http::coupons::{ClaimResponse, RedeemForm, RedeemResponse};

/// OpenAPI document served by Swagger UI in debug builds.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "couponly",
        description = "Restaurant offers and single-use coupon codes"
    ),
    paths(
        crate::inbound::http::coupons::claim,
        crate::inbound::http::coupons::redeem,
        crate::inbound::http::health::live,
        crate::inbound::http::health::ready,
    ),
    components(schemas(ClaimResponse, RedeemForm, RedeemResponse, ErrorCode))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn document_lists_json_endpoints() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/redeem"));
        assert!(paths.iter().any(|p| p.as_str() == "/claim/{offer_id}"));
    }
}

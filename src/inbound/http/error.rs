//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting actix handlers
//! turn failures into the `{ok: false, ...}` JSON envelope and the status
//! codes staff tooling relies on (400/404/410/409).

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::error;

use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Gone => StatusCode::GONE,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn public_message(error: &Error) -> &str {
    // Do not leak internal failure detail to clients.
    if matches!(error.code(), ErrorCode::InternalError) {
        error!(error = %error, "internal error surfaced to client");
        "internal server error"
    } else {
        error.message()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "ok": false,
            "code": self.code(),
            "error": public_message(self),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;

    #[rstest]
    #[case(Error::invalid_request("missing code"), StatusCode::BAD_REQUEST)]
    #[case(Error::not_found("code not found"), StatusCode::NOT_FOUND)]
    #[case(Error::gone("expired"), StatusCode::GONE)]
    #[case(Error::conflict("already redeemed"), StatusCode::CONFLICT)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn domain_codes_map_to_http_statuses(#[case] error: Error, #[case] expected: StatusCode) {
        assert_eq!(error.status_code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn error_body_uses_ok_false_envelope() {
        let response = Error::conflict("already redeemed").error_response();
        let body = to_bytes(response.into_body()).await.expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");

        assert_eq!(json["ok"], false);
        assert_eq!(json["code"], "conflict");
        assert_eq!(json["error"], "already redeemed");
    }

    #[rstest]
    #[tokio::test]
    async fn internal_errors_are_redacted() {
        let response = Error::internal("database path /secret/coupons.db").error_response();
        let body = to_bytes(response.into_body()).await.expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");

        assert_eq!(json["error"], "internal server error");
    }
}

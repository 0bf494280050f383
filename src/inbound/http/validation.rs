//! Shared validation helpers for inbound HTTP adapters.

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::Error;

/// Date format accepted by offer creation.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Extract a required, non-blank form field, trimmed.
pub(crate) fn required_field(value: Option<&str>, field: &'static str) -> Result<String, Error> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(
            Error::invalid_request(format!("{field} is required")).with_details(json!({
                "field": field,
                "code": "missing_field",
            })),
        ),
    }
}

/// Parse an expiry date in `YYYY-MM-DD` form.
pub(crate) fn parse_expiry_date(value: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        Error::invalid_request("expires must be YYYY-MM-DD").with_details(json!({
            "field": "expires",
            "value": value,
            "code": "invalid_date",
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(Some("  Chipotle  "), Ok("Chipotle"))]
    #[case(Some("   "), Err(()))]
    #[case(None, Err(()))]
    fn required_field_trims_and_rejects_blank(
        #[case] input: Option<&str>,
        #[case] expected: Result<&str, ()>,
    ) {
        let result = required_field(input, "restaurant");
        match expected {
            Ok(value) => assert_eq!(result.expect("field accepted"), value),
            Err(()) => {
                let err = result.expect_err("field rejected");
                assert_eq!(err.code(), ErrorCode::InvalidRequest);
            }
        }
    }

    #[rstest]
    fn parse_expiry_date_round_trips() {
        let date = parse_expiry_date("2025-11-05").expect("valid date");
        assert_eq!(date.to_string(), "2025-11-05");
    }

    #[rstest]
    #[case("05/11/2025")]
    #[case("2025-13-01")]
    #[case("tomorrow")]
    fn parse_expiry_date_rejects_other_formats(#[case] input: &str) {
        let err = parse_expiry_date(input).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}

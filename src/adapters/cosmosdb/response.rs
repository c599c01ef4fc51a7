//! Response metadata and error mapping
//!
//! The SDK reports request charges in the `x-ms-request-charge` header and
//! service failures as HTTP errors. These helpers turn both into the crate's
//! own types.

use crate::domain::CosmosDbError;
use azure_core::http::headers::{HeaderName, Headers};

/// Header carrying the request units charged for an operation
pub const REQUEST_CHARGE: HeaderName = HeaderName::from_static("x-ms-request-charge");

/// Reads the request charge from response headers
///
/// Missing or unparsable headers count as zero.
pub fn request_charge(headers: &Headers) -> f64 {
    headers
        .get_optional_str(&REQUEST_CHARGE)
        .and_then(parse_charge)
        .unwrap_or(0.0)
}

fn parse_charge(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|c| c.is_finite())
}

/// HTTP status carried by an SDK error, if the service answered
pub fn error_status(error: &azure_core::Error) -> Option<u16> {
    error.http_status().map(u16::from)
}

/// Maps an SDK error to a [`CosmosDbError`]
///
/// Errors with an HTTP status become [`CosmosDbError::Service`]; anything else
/// (DNS, TLS, I/O, credential acquisition) is reported through `fallback`.
pub fn map_sdk_error(
    error: azure_core::Error,
    fallback: impl FnOnce(String) -> CosmosDbError,
) -> CosmosDbError {
    match error_status(&error) {
        Some(status) => CosmosDbError::service(status, error.to_string()),
        None => fallback(error.to_string()),
    }
}

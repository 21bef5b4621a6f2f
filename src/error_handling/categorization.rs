//! Error categorization.
//!
//! Maps transport errors and error response bodies onto [`ApiError`].

use serde_json::Value;

use super::types::ApiError;

/// Body fields checked, in order, for a human-readable error message.
const MESSAGE_FIELDS: &[&str] = &["detail", "message", "error"];

/// Categorizes a `reqwest::Error` into an `ApiError`.
///
/// Errors that carry a status are HTTP errors; decode errors mean the backend
/// answered with an unexpected body; everything else (connect, timeout,
/// request, body) means the backend could not be reached.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ApiError {
    if let Some(status) = error.status() {
        return ApiError::Http {
            status: status.as_u16(),
            message: format!("HTTP {}", status.as_u16()),
        };
    }

    if error.is_decode() {
        return ApiError::Decode {
            status: 200,
            message: error.to_string(),
        };
    }

    ApiError::Network {
        details: error.to_string(),
    }
}

/// Extracts the error message from a parsed error body.
///
/// Checks `detail`, `message` and `error` in that order. String values are
/// used as-is; structured values (validation error lists, for example) are
/// rendered as compact JSON. Falls back to `HTTP <status>`.
pub fn extract_error_message(status: u16, body: &Value) -> String {
    for field in MESSAGE_FIELDS {
        match body.get(field) {
            Some(Value::String(s)) if !s.trim().is_empty() => return s.clone(),
            Some(Value::Null) | None => continue,
            Some(Value::String(_)) => continue,
            Some(other) => return other.to_string(),
        }
    }
    format!("HTTP {status}")
}

/// Builds an `ApiError::Http` from a status and a parsed error body.
pub fn http_error(status: u16, body: &Value) -> ApiError {
    ApiError::Http {
        status,
        message: extract_error_message(status, body),
    }
}

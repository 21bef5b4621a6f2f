//! Error type definitions.
//!
//! This module defines the error types surfaced by the library: backend API
//! failures, registry lookup failures, session store failures and
//! initialization failures.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

use crate::config::{BACKEND_UNREACHABLE_MESSAGE, NETWORK_ERROR_STATUS};

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// A configured base URL is not a valid absolute URL.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrlError {
        /// The rejected value
        url: String,
        /// Parser message
        reason: String,
    },
}

/// Errors returned by the moderation backend client.
///
/// Every failure carries an HTTP-like status so callers can render a single
/// "status + message" notification regardless of where the call failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("{message} (HTTP {status})")]
    Http {
        /// Response status code
        status: u16,
        /// `detail`, `message` or `error` field of the response body
        message: String,
    },

    /// The request never got an answer (connection refused, DNS, timeout).
    #[error("{}", BACKEND_UNREACHABLE_MESSAGE)]
    Network {
        /// Underlying transport error, for logs only
        details: String,
    },

    /// A 2xx response whose body does not match the expected shape.
    #[error("Unexpected response body (HTTP {status}): {message}")]
    Decode {
        /// Response status code
        status: u16,
        /// Deserializer message
        message: String,
    },
}

impl ApiError {
    /// Status code of the failure; transport errors map to a synthetic 503.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Http { status, .. } | ApiError::Decode { status, .. } => *status,
            ApiError::Network { .. } => NETWORK_ERROR_STATUS,
        }
    }

    /// Human-readable message suitable for a notification.
    pub fn message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// True when the backend could not be reached at all.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    /// True for `404 Not Found` answers.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Http { status: 404, .. })
    }
}

/// Errors from the Checko company-registry lookup.
#[derive(Error, Debug)]
pub enum CheckoError {
    /// No API key configured.
    #[error("Checko API key is not configured (set CHECKO_API_KEY)")]
    MissingApiKey,

    /// INN is not 10 or 12 digits.
    #[error("Invalid INN '{0}': expected 10 or 12 digits")]
    InvalidInn(String),

    /// The `company` sub-request failed; nothing usable can be built.
    #[error("Company lookup failed: {0}")]
    Company(#[source] ApiError),

    /// The registry answered but reported no company for the INN.
    #[error("Company with INN {0} not found in registry")]
    NotFound(String),
}

/// Errors from the client-local key/value store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The write would exceed the store quota.
    #[error("Storage quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded {
        /// Size of the rejected write
        needed: usize,
        /// Remaining capacity
        available: usize,
    },

    /// Filesystem error from the file-backed store.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

//! Error handling.
//!
//! This module provides:
//! - Error type definitions for the backend client, the registry lookup,
//!   the session store and initialization
//! - Categorization of transport errors and error bodies into `ApiError`
//!
//! Nothing here is fatal to the process: callers render the error as a
//! notification and keep whatever (possibly stale) data they already have.

mod categorization;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, extract_error_message, http_error};
pub use types::{ApiError, CheckoError, InitializationError, StoreError};

//! HTTP client initialization.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::ClientBuilder;

use crate::config::Config;

/// Initializes the HTTP client shared by the backend and registry clients.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the configuration
/// - Per-request timeout from the configuration
/// - `Accept: application/json` on every request
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    ClientBuilder::new()
        .timeout(config.timeout())
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .build()
}

//! Configuration constants.
//!
//! This module defines the tunables shared across the crate: backend defaults,
//! cache and polling timing, and the thresholds of both risk strategies.

use std::time::Duration;

// Backend defaults
/// Base URL of the moderation backend when none is configured
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
/// Base URL of the Checko company-registry API
pub const DEFAULT_CHECKO_BASE_URL: &str = "https://api.checko.ru/v2";
/// Directory used by the file-backed session store
pub const DEFAULT_CACHE_DIR: &str = ".supplier_desk_cache";
/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// User-Agent sent to the backend and to Checko
pub const DEFAULT_USER_AGENT: &str = concat!("supplier_desk/", env!("CARGO_PKG_VERSION"));

/// Content type for JSON request bodies
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
/// Synthetic status assigned to transport failures (backend never answered)
pub const NETWORK_ERROR_STATUS: u16 = 503;
/// Message shown when the backend cannot be reached at all
pub const BACKEND_UNREACHABLE_MESSAGE: &str =
    "Backend is unreachable. Check that the API server is running.";

// Session cache
/// Lifetime of the cached supplier and blacklist lists
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

// Job polling
/// Interval between two status fetches of a running backend job.
/// Polling has no backoff and no cap.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

// Root domain heuristic
/// Number of trailing DNS labels kept as the root domain (not PSL aware)
pub const ROOT_DOMAIN_LABELS: usize = 2;

// Reliability scorer (0-100)
pub const RELIABILITY_BASE_SCORE: i32 = 70;
/// Company must be strictly older than this many full years for the age bonus
pub const RELIABILITY_MIN_AGE_YEARS: i32 = 3;
pub const RELIABILITY_ENFORCEMENT_SUM_LIMIT: f64 = 5_000_000.0;
pub const RELIABILITY_CLAIM_SUM_LIMIT: f64 = 100_000_000.0;
pub const RELIABILITY_CASE_COUNT_LIMIT: u64 = 50;
/// Upper bound applied to companies that are liquidating or bankrupt
pub const RELIABILITY_INACTIVE_CAP: i32 = 30;
pub const RELIABILITY_HIGH_THRESHOLD: i32 = 75;
pub const RELIABILITY_MEDIUM_THRESHOLD: i32 = 50;
/// Number of reasons kept in the short `reasons` list
pub const MAX_REASONS: usize = 5;

// Verdict heuristic (supplier card)
pub const VERDICT_CLAIM_SUM_LIMIT: f64 = 1_000_000_000.0;
pub const VERDICT_INSPECTIONS_LIMIT: u64 = 5;

/// Status substrings (lower-case) that mark a company as not active.
///
/// `ликвид` covers both `ликвидирована` and `в процессе ликвидации`.
pub const INACTIVE_STATUS_MARKERS: &[&str] = &["ликвид", "банкрот"];

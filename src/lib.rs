//! supplier_desk library: moderator toolkit for supplier sourcing
//!
//! This library provides the client-side logic of a supplier moderation
//! workflow over a crawl backend: grouping crawled URLs by root domain,
//! reconciling which search engine found them, enriching suppliers from the
//! Checko company registry, and scoring supplier reliability.
//!
//! # Example
//!
//! ```no_run
//! use supplier_desk::api::ApiClient;
//! use supplier_desk::domain::{build_domain_groups, GroupingContext};
//! use supplier_desk::Config;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let api = ApiClient::from_config(&Config::default())?;
//! let bundle = api.fetch_run_bundle("42").await?;
//! let blacklist = api.list_blacklist().await?;
//! let suppliers = api.list_suppliers().await?;
//!
//! let groups = build_domain_groups(
//!     &bundle.queue,
//!     &GroupingContext {
//!         blacklist: &blacklist,
//!         suppliers: &suppliers,
//!         logs: bundle.logs.as_ref(),
//!         sort: Default::default(),
//!     },
//! );
//! for group in groups {
//!     println!("{} ({} URLs)", group.domain, group.total_urls);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! Network calls and polling require a Tokio runtime.

pub mod api;
pub mod app;
pub mod autosave;
pub mod cache;
pub mod checko;
pub mod config;
pub mod domain;
pub mod error_handling;
pub mod initialization;
pub mod models;
pub mod polling;
pub mod risk;
pub mod utils;

// Re-export public API
pub use app::run_command;
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{ApiError, CheckoError, InitializationError, StoreError};

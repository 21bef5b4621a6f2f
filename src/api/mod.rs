//! REST client of the moderation backend.
//!
//! Every call returns `Result<_, ApiError>`; callers decide whether a failure
//! is shown to the moderator or silently dropped.

mod client;
mod endpoints;

pub use client::ApiClient;
pub use endpoints::{DomainQueueQuery, RunBundle};

pub(crate) use client::{decode, read_response};

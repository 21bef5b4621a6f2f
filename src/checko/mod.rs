//! Checko company-registry integration.
//!
//! - `types` - typed snapshot decoded from the registry's Cyrillic payloads
//! - `client` - concurrent lookup of the five registry sub-resources
//! - `enrichment` - mapping of a snapshot onto supplier fields

mod client;
mod enrichment;
mod types;

pub use client::{is_valid_inn, CheckoClient};
pub use enrichment::enrichment_from_snapshot;
pub use types::{
    Address, Capital, CheckoSnapshot, CompanyInfo, CompanyStatus, Contacts, Enforcements,
    FinanceYear, Finances, Inspection, Inspections, LegalCases, LegalSide,
};

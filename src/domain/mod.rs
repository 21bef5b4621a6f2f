//! Domain normalization, grouping and source reconciliation.
//!
//! Key functions:
//! - `normalize_url()` - Canonical comparable form of a URL
//! - `extract_root_domain()` - Last two labels of the host (display casing)
//! - `group_by_domain()` - One group per root domain, first-seen order
//! - `build_domain_groups()` - Grouping plus blacklist, suppliers, sources, sort
//! - `collect_domain_sources()` / `get_url_sources()` - Which engines found a URL

mod grouping;
mod normalize;
mod sources;

pub use grouping::{
    attach_suppliers, build_domain_groups, filter_blacklisted, group_by_domain, sort_groups,
    GroupSort, GroupingContext,
};
pub use normalize::{extract_root_domain, normalize_url, root_domain_key};
pub use sources::{collect_domain_sources, get_url_sources};

#[cfg(test)]
mod tests {
    include!("tests.rs");
}

//! Grouping of crawled URLs by root domain.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use super::normalize::{extract_root_domain, root_domain_key};
use super::sources::collect_domain_sources;
use crate::models::{
    BlacklistEntry, DomainGroup, DomainQueueEntry, DomainUrl, ParsingLogs, SupplierRecord,
};

/// Folds queue entries into one group per root domain.
///
/// The key is the lower-cased root domain of each entry's `domain`; the
/// group keeps the display casing of the first entry seen. URLs are kept in
/// input order and groups in first-seen order. Nothing is sorted here.
pub fn group_by_domain(entries: &[DomainQueueEntry]) -> Vec<DomainGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<DomainGroup> = Vec::new();

    for entry in entries {
        let display = extract_root_domain(&entry.domain);
        let key = display.to_lowercase();

        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                groups.push(DomainGroup {
                    domain: display,
                    urls: Vec::new(),
                    total_urls: 0,
                    supplier_type: None,
                    supplier_id: None,
                    sources: Vec::new(),
                });
                index.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };

        let group = &mut groups[slot];
        group.urls.push(DomainUrl::from(entry));
        group.total_urls += 1;
    }

    groups
}

/// Removes groups whose root domain is blacklisted.
pub fn filter_blacklisted(
    groups: Vec<DomainGroup>,
    blacklist: &[BlacklistEntry],
) -> Vec<DomainGroup> {
    if blacklist.is_empty() {
        return groups;
    }
    let blocked: HashSet<String> = blacklist.iter().map(|b| root_domain_key(&b.domain)).collect();
    groups
        .into_iter()
        .filter(|g| !blocked.contains(&root_domain_key(&g.domain)))
        .collect()
}

/// Attaches the type and id of the first supplier sharing the group's root domain.
pub fn attach_suppliers(groups: &mut [DomainGroup], suppliers: &[SupplierRecord]) {
    let mut by_domain: HashMap<String, &SupplierRecord> = HashMap::new();
    for supplier in suppliers {
        if let Some(domain) = supplier.domain.as_deref().filter(|d| !d.trim().is_empty()) {
            by_domain.entry(root_domain_key(domain)).or_insert(supplier);
        }
    }

    for group in groups.iter_mut() {
        if let Some(supplier) = by_domain.get(&root_domain_key(&group.domain)) {
            group.supplier_type = Some(supplier.supplier_type);
            group.supplier_id = Some(supplier.id);
        }
    }
}

/// Display order of domain groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum GroupSort {
    /// Most URLs first, ties by domain
    #[default]
    #[value(name = "count")]
    UrlCountDesc,
    /// By domain, case-insensitive
    #[value(name = "alpha")]
    Alphabetical,
}

/// Sorts groups in place (stable).
pub fn sort_groups(groups: &mut [DomainGroup], sort: GroupSort) {
    let by_name =
        |a: &DomainGroup, b: &DomainGroup| a.domain.to_lowercase().cmp(&b.domain.to_lowercase());
    match sort {
        GroupSort::UrlCountDesc => groups.sort_by(|a, b| match b.total_urls.cmp(&a.total_urls) {
            Ordering::Equal => by_name(a, b),
            other => other,
        }),
        GroupSort::Alphabetical => groups.sort_by(by_name),
    }
}

/// Everything the moderation view combines with the raw queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupingContext<'a> {
    pub blacklist: &'a [BlacklistEntry],
    pub suppliers: &'a [SupplierRecord],
    /// Run logs; when present they decide sources instead of the URL tags
    pub logs: Option<&'a ParsingLogs>,
    pub sort: GroupSort,
}

/// Builds the moderation view of a run's queue.
///
/// Groups, drops blacklisted domains, attaches supplier metadata and sources,
/// then sorts.
pub fn build_domain_groups(
    entries: &[DomainQueueEntry],
    ctx: &GroupingContext<'_>,
) -> Vec<DomainGroup> {
    let mut groups = filter_blacklisted(group_by_domain(entries), ctx.blacklist);
    attach_suppliers(&mut groups, ctx.suppliers);
    for group in groups.iter_mut() {
        group.sources = collect_domain_sources(&group.urls, ctx.logs);
    }
    sort_groups(&mut groups, ctx.sort);
    groups
}

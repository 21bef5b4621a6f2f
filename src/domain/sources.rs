//! Search-engine source reconciliation.
//!
//! The run's parsing logs are authoritative when the caller has them; the
//! per-URL `source` tag set by the crawler is the fallback.

use std::collections::{BTreeSet, HashSet};

use strum::IntoEnumIterator;

use super::normalize::normalize_url;
use crate::models::{DomainUrl, ParsingLogs, SearchEngine, SearchSource};

/// Engines implied by a crawler tag.
fn engines_for_tag(tag: Option<SearchSource>) -> &'static [SearchEngine] {
    match tag {
        Some(SearchSource::Both) => &[SearchEngine::Google, SearchEngine::Yandex],
        Some(SearchSource::Google) => &[SearchEngine::Google],
        Some(SearchSource::Yandex) => &[SearchEngine::Yandex],
        Some(SearchSource::Unknown) | None => &[],
    }
}

/// Normalized `last_links` of every engine that has a log.
fn normalized_links(logs: &ParsingLogs) -> Vec<(SearchEngine, HashSet<String>)> {
    SearchEngine::iter()
        .filter_map(|engine| {
            logs.engine(engine).map(|log| {
                let links = log.last_links.iter().map(|l| normalize_url(l)).collect();
                (engine, links)
            })
        })
        .collect()
}

/// Determines which engines surfaced a set of URLs.
///
/// With `logs`, a URL counts for an engine when its normalized form is among
/// that engine's normalized `last_links`. Without `logs`, each URL's own tag
/// is used (`both` adds both engines). The two strategies are never mixed in
/// one call.
///
/// Returns a sorted, deduplicated subset of `{google, yandex}`.
pub fn collect_domain_sources(urls: &[DomainUrl], logs: Option<&ParsingLogs>) -> Vec<SearchEngine> {
    let mut found = BTreeSet::new();

    match logs {
        Some(logs) => {
            let engines = normalized_links(logs);
            for url in urls {
                let normalized = normalize_url(&url.url);
                for (engine, links) in &engines {
                    if links.contains(&normalized) {
                        found.insert(*engine);
                    }
                }
            }
        }
        None => {
            for url in urls {
                found.extend(engines_for_tag(url.source).iter().copied());
            }
        }
    }

    found.into_iter().collect()
}

/// Determines which engines surfaced a single URL.
///
/// Checks the logs first and falls back to the tag only when the logs matched
/// nothing for this URL.
pub fn get_url_sources(
    url: &str,
    tag: Option<SearchSource>,
    logs: Option<&ParsingLogs>,
) -> Vec<SearchEngine> {
    if let Some(logs) = logs {
        let normalized = normalize_url(url);
        let matched: Vec<SearchEngine> = normalized_links(logs)
            .into_iter()
            .filter(|(_, links)| links.contains(&normalized))
            .map(|(engine, _)| engine)
            .collect();
        if !matched.is_empty() {
            return matched;
        }
    }
    engines_for_tag(tag).to_vec()
}

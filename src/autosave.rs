//! Automatic supplier upsert from extraction results.
//!
//! After a batch extraction finishes, every domain that yielded both an INN
//! and an email is matched against known suppliers (by INN, then by root
//! domain). Matches get their missing INN or email filled in, other domains
//! become new suppliers. With a registry client, each touched supplier is
//! then enriched in a second update.
//!
//! Duplicate runs are suppressed by a one-shot latch and a set of processed
//! `domain|inn` keys held in memory. Nothing coordinates two processes
//! working on the same run.

use std::collections::{BTreeMap, HashSet};

use log::{debug, info, warn};

use crate::api::ApiClient;
use crate::checko::{enrichment_from_snapshot, is_valid_inn, CheckoClient};
use crate::domain::{extract_root_domain, root_domain_key};
use crate::models::{ExtractionResult, NewSupplier, SupplierRecord, SupplierType, SupplierUpdate};

/// Counters of one auto-save pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoSaveOutcome {
    /// New suppliers
    pub created: usize,
    /// Existing suppliers that got a missing INN or email
    pub updated: usize,
    /// Suppliers updated with registry data
    pub enriched: usize,
    /// Results without INN and email, already processed, or already complete
    pub skipped: usize,
    /// Failed backend or registry calls
    pub failed: usize,
}

impl AutoSaveOutcome {
    /// True when the pass wrote nothing.
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.updated == 0 && self.enriched == 0
    }
}

/// One-shot supplier upsert for a finished extraction run.
#[derive(Debug, Default)]
pub struct SupplierAutoSaver {
    fired: bool,
    processed: HashSet<String>,
}

/// A successful result reduced to what the upsert needs.
struct Candidate<'a> {
    key: String,
    domain: &'a str,
    inn: &'a str,
    email: &'a str,
}

fn candidate(result: &ExtractionResult) -> Option<Candidate<'_>> {
    if !result.is_success() {
        return None;
    }
    let inn = result.inn.as_deref().map(str::trim).filter(|i| is_valid_inn(i))?;
    let email = result.primary_email()?.trim();
    Some(Candidate {
        key: format!("{}|{}", root_domain_key(&result.domain), inn),
        domain: &result.domain,
        inn,
        email,
    })
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn find_match<'a>(known: &'a [SupplierRecord], c: &Candidate<'_>) -> Option<&'a SupplierRecord> {
    let domain_key = root_domain_key(c.domain);
    known
        .iter()
        .find(|s| s.inn.as_deref().map(str::trim) == Some(c.inn))
        .or_else(|| {
            known.iter().find(|s| {
                s.domain
                    .as_deref()
                    .is_some_and(|d| root_domain_key(d) == domain_key)
            })
        })
}

impl SupplierAutoSaver {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once `run` has fired and until `reset`.
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Re-arms the latch and forgets processed keys.
    pub fn reset(&mut self) {
        self.fired = false;
        self.processed.clear();
    }

    /// Upserts suppliers for `results` (domain -> result).
    ///
    /// Only the first call after construction or `reset` does anything;
    /// later calls return an empty outcome. Individual failures are logged
    /// and counted, never propagated. A supplier created before a failed
    /// enrichment stays as it is.
    pub async fn run(
        &mut self,
        api: &ApiClient,
        checko: Option<&CheckoClient>,
        results: &BTreeMap<String, ExtractionResult>,
        existing: &[SupplierRecord],
    ) -> AutoSaveOutcome {
        let mut outcome = AutoSaveOutcome::default();
        if self.fired {
            debug!("Auto-save already ran for this session, skipping");
            return outcome;
        }
        self.fired = true;

        let mut known = existing.to_vec();

        for result in results.values() {
            let Some(c) = candidate(result) else {
                outcome.skipped += 1;
                continue;
            };
            if !self.processed.insert(c.key.clone()) {
                outcome.skipped += 1;
                continue;
            }

            let saved = match find_match(&known, &c) {
                Some(record) => {
                    let update = SupplierUpdate {
                        inn: is_blank(record.inn.as_deref()).then(|| c.inn.to_string()),
                        email: is_blank(record.email.as_deref()).then(|| c.email.to_string()),
                        ..Default::default()
                    };
                    if update.is_empty() {
                        debug!("Supplier {} already has INN and email", record.id);
                        outcome.skipped += 1;
                        if record.checko_data.is_some() {
                            continue;
                        }
                        record.clone()
                    } else {
                        match api.update_supplier(record.id, &update).await {
                            Ok(updated) => {
                                info!("Updated supplier {} from {}", updated.id, c.domain);
                                outcome.updated += 1;
                                updated
                            }
                            Err(e) => {
                                warn!(
                                    "Failed to update supplier {} from {}: {}",
                                    record.id, c.domain, e
                                );
                                outcome.failed += 1;
                                continue;
                            }
                        }
                    }
                }
                None => {
                    let new = NewSupplier {
                        name: extract_root_domain(c.domain),
                        inn: Some(c.inn.to_string()),
                        email: Some(c.email.to_string()),
                        domain: Some(root_domain_key(c.domain)),
                        address: None,
                        supplier_type: SupplierType::Supplier,
                    };
                    match api.create_supplier(&new).await {
                        Ok(created) => {
                            info!("Created supplier {} for {}", created.id, c.domain);
                            outcome.created += 1;
                            created
                        }
                        Err(e) => {
                            warn!("Failed to create supplier for {}: {}", c.domain, e);
                            outcome.failed += 1;
                            continue;
                        }
                    }
                }
            };

            let id = saved.id;
            match known.iter_mut().find(|s| s.id == id) {
                Some(slot) => *slot = saved,
                None => known.push(saved),
            }

            if let Some(checko) = checko {
                if enrich(api, checko, id, c.inn).await {
                    outcome.enriched += 1;
                } else {
                    outcome.failed += 1;
                }
            }
        }

        info!(
            "Auto-save: {} created, {} updated, {} enriched, {} skipped, {} failed",
            outcome.created, outcome.updated, outcome.enriched, outcome.skipped, outcome.failed
        );
        outcome
    }
}

async fn enrich(api: &ApiClient, checko: &CheckoClient, id: i64, inn: &str) -> bool {
    let snapshot = match checko.fetch_snapshot(inn).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Registry lookup failed for supplier {} (INN {}): {}", id, inn, e);
            return false;
        }
    };
    let update = match enrichment_from_snapshot(&snapshot) {
        Ok(update) => update,
        Err(e) => {
            warn!("Failed to serialize registry snapshot for INN {}: {}", inn, e);
            return false;
        }
    };
    match api.update_supplier(id, &update).await {
        Ok(_) => {
            debug!("Enriched supplier {} from registry", id);
            true
        }
        Err(e) => {
            warn!("Failed to store registry data for supplier {}: {}", id, e);
            false
        }
    }
}

//! Session-scoped cache of backend lists and per-run extraction state.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::clock::{Clock, SystemClock};
use super::store::{FileStore, KeyValueStore};
use crate::config::{Config, CACHE_TTL};
use crate::error_handling::StoreError;
use crate::models::{BlacklistEntry, ExtractionKind, ExtractionResult, SupplierRecord};

const SUPPLIERS_KEY: &str = "supplier_desk:suppliers";
const BLACKLIST_KEY: &str = "supplier_desk:blacklist";
/// Write time of the last list payload, shared by suppliers and blacklist.
const TIMESTAMP_KEY: &str = "supplier_desk:cache_timestamp";

fn extraction_results_key(kind: ExtractionKind, run_id: &str) -> String {
    format!("supplier_desk:{kind}_results:{run_id}")
}

fn extraction_job_key(kind: ExtractionKind, run_id: &str) -> String {
    format!("supplier_desk:{kind}_job:{run_id}")
}

/// Time-boxed cache of the supplier and blacklist lists, plus per-run
/// extraction results and job ids.
///
/// Both lists share one write timestamp. Reading either list after the TTL
/// clears both lists. Invalidating one list leaves the timestamp in place,
/// so a list written earlier stays fresh as long as the other one is
/// rewritten. Per-run extraction state has no TTL.
pub struct SessionCache<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl SessionCache<FileStore, SystemClock> {
    /// File-backed cache under `config.cache_dir`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(FileStore::new(config.cache_dir.clone()), SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> SessionCache<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Cached suppliers, or `None` on a miss or after the TTL.
    pub fn get_cached_suppliers(&self) -> Option<Vec<SupplierRecord>> {
        self.read_fresh(SUPPLIERS_KEY)
    }

    /// Caches suppliers without their `checko_data` snapshots.
    ///
    /// On a failed write the list cache is cleared and the write retried
    /// once.
    pub fn set_cached_suppliers(&self, suppliers: &[SupplierRecord]) -> Result<(), StoreError> {
        let stripped: Vec<SupplierRecord> = suppliers
            .iter()
            .map(|s| SupplierRecord {
                checko_data: None,
                ..s.clone()
            })
            .collect();
        self.write_fresh(SUPPLIERS_KEY, &stripped)
    }

    pub fn get_cached_blacklist(&self) -> Option<Vec<BlacklistEntry>> {
        self.read_fresh(BLACKLIST_KEY)
    }

    pub fn set_cached_blacklist(&self, entries: &[BlacklistEntry]) -> Result<(), StoreError> {
        self.write_fresh(BLACKLIST_KEY, entries)
    }

    /// Drops the cached suppliers. The shared timestamp is kept.
    pub fn invalidate_suppliers(&self) {
        self.store.remove(SUPPLIERS_KEY);
    }

    /// Drops the cached blacklist. The shared timestamp is kept.
    pub fn invalidate_blacklist(&self) {
        self.store.remove(BLACKLIST_KEY);
    }

    /// Drops both lists and the shared timestamp.
    pub fn clear(&self) {
        for key in [SUPPLIERS_KEY, BLACKLIST_KEY, TIMESTAMP_KEY] {
            self.store.remove(key);
        }
    }

    /// Extraction results accumulated for a run, keyed by domain.
    pub fn get_extraction_results(
        &self,
        kind: ExtractionKind,
        run_id: &str,
    ) -> BTreeMap<String, ExtractionResult> {
        self.read(&extraction_results_key(kind, run_id))
            .unwrap_or_default()
    }

    pub fn set_extraction_results(
        &self,
        kind: ExtractionKind,
        run_id: &str,
        results: &BTreeMap<String, ExtractionResult>,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(results)?;
        self.store.set(&extraction_results_key(kind, run_id), &json)
    }

    pub fn clear_extraction_results(&self, kind: ExtractionKind, run_id: &str) {
        self.store.remove(&extraction_results_key(kind, run_id));
    }

    /// Id of the batch job last started for a run.
    pub fn get_extraction_job(&self, kind: ExtractionKind, run_id: &str) -> Option<String> {
        self.read(&extraction_job_key(kind, run_id))
    }

    pub fn set_extraction_job(
        &self,
        kind: ExtractionKind,
        run_id: &str,
        job_id: &str,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(job_id)?;
        self.store.set(&extraction_job_key(kind, run_id), &json)
    }

    pub fn clear_extraction_job(&self, kind: ExtractionKind, run_id: &str) {
        self.store.remove(&extraction_job_key(kind, run_id));
    }

    /// Decodes a cached value. Malformed entries are removed and read as a miss.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::debug!("Dropping malformed cache entry {key}: {e}");
                self.store.remove(key);
                None
            }
        }
    }

    fn read_fresh<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.is_fresh() {
            return None;
        }
        self.read(key)
    }

    /// True while the shared timestamp is within the TTL.
    ///
    /// An expired or unreadable timestamp clears the list cache.
    fn is_fresh(&self) -> bool {
        let Some(written_ms) = self.read::<i64>(TIMESTAMP_KEY) else {
            return false;
        };
        let age_ms = self.clock.now().timestamp_millis().saturating_sub(written_ms);
        // A timestamp from the future counts as fresh
        let expired = u128::try_from(age_ms).is_ok_and(|age| age > CACHE_TTL.as_millis());
        if expired {
            log::debug!("List cache expired after {age_ms} ms");
            self.clear();
        }
        !expired
    }

    fn write_fresh<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        let attempt = || -> Result<(), StoreError> {
            self.store.set(key, &json)?;
            self.store
                .set(TIMESTAMP_KEY, &self.clock.now().timestamp_millis().to_string())
        };

        match attempt() {
            Ok(()) => Ok(()),
            Err(first) => {
                log::debug!("Cache write for {key} failed ({first}), clearing and retrying");
                self.clear();
                attempt().inspect_err(|e| log::warn!("Failed to cache {key}: {e}"))
            }
        }
    }
}

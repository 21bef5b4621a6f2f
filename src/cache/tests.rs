// Cache module tests.

use std::collections::BTreeMap;

use chrono::{TimeDelta, TimeZone, Utc};

use super::*;
use crate::error_handling::StoreError;
use crate::models::{BlacklistEntry, ExtractionKind, ExtractionResult, SupplierRecord};

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
}

fn supplier(id: i64) -> SupplierRecord {
    SupplierRecord {
        id,
        name: format!("Поставщик {id}"),
        inn: Some("7707083893".to_string()),
        domain: Some("example.com".to_string()),
        checko_data: Some(r#"{"company":{"ИНН":"7707083893"}}"#.to_string()),
        ..Default::default()
    }
}

fn blacklisted(domain: &str) -> BlacklistEntry {
    BlacklistEntry {
        domain: domain.to_string(),
        reason: Some("spam".to_string()),
        added_by: None,
        added_at: None,
        parsing_run_id: None,
    }
}

#[test]
fn test_suppliers_round_trip_without_checko_data() {
    let cache = SessionCache::new(MemoryStore::new(), clock());
    let suppliers = vec![supplier(1), supplier(2)];
    cache.set_cached_suppliers(&suppliers).unwrap();

    let cached = cache.get_cached_suppliers().unwrap();
    assert_eq!(cached.len(), 2);
    for (cached, original) in cached.iter().zip(&suppliers) {
        assert_eq!(cached.checko_data, None);
        assert_eq!(
            cached,
            &SupplierRecord {
                checko_data: None,
                ..original.clone()
            }
        );
    }
}

#[test]
fn test_ttl_expiry_clears_storage() {
    let clock = clock();
    let store = MemoryStore::new();
    let cache = SessionCache::new(store.clone(), clock.clone());
    cache.set_cached_suppliers(&[supplier(1)]).unwrap();
    cache.set_cached_blacklist(&[blacklisted("spam.ru")]).unwrap();

    clock.advance(TimeDelta::minutes(5));
    assert!(cache.get_cached_suppliers().is_some());

    clock.advance(TimeDelta::seconds(1));
    assert!(cache.get_cached_suppliers().is_none());
    assert!(store.is_empty());
    assert!(cache.get_cached_blacklist().is_none());
}

#[test]
fn test_miss_without_timestamp() {
    let store = MemoryStore::new();
    store.set("supplier_desk:suppliers", "[]").unwrap();
    let cache = SessionCache::new(store, clock());
    assert!(cache.get_cached_suppliers().is_none());
}

#[test]
fn test_timestamp_is_shared_between_lists() {
    let clock = clock();
    let cache = SessionCache::new(MemoryStore::new(), clock.clone());
    cache.set_cached_blacklist(&[blacklisted("spam.ru")]).unwrap();

    clock.advance(TimeDelta::minutes(4));
    cache.set_cached_suppliers(&[supplier(1)]).unwrap();

    // The blacklist is older than the TTL but rides on the newer timestamp
    clock.advance(TimeDelta::minutes(3));
    assert_eq!(cache.get_cached_blacklist().map(|b| b.len()), Some(1));
}

#[test]
fn test_invalidate_is_targeted() {
    let cache = SessionCache::new(MemoryStore::new(), clock());
    cache.set_cached_suppliers(&[supplier(1)]).unwrap();
    cache.set_cached_blacklist(&[blacklisted("spam.ru")]).unwrap();

    cache.invalidate_suppliers();
    assert!(cache.get_cached_suppliers().is_none());
    assert!(cache.get_cached_blacklist().is_some());

    cache.invalidate_blacklist();
    assert!(cache.get_cached_blacklist().is_none());
    assert!(cache.store().get("supplier_desk:cache_timestamp").is_some());
}

#[test]
fn test_malformed_entry_reads_as_miss_and_is_removed() {
    let store = MemoryStore::new();
    let cache = SessionCache::new(store.clone(), clock());
    cache.set_cached_blacklist(&[blacklisted("spam.ru")]).unwrap();
    store.set("supplier_desk:blacklist", "{oops").unwrap();

    assert!(cache.get_cached_blacklist().is_none());
    assert!(store.get("supplier_desk:blacklist").is_none());
}

#[test]
fn test_quota_failure_clears_and_retries_once() {
    let store = MemoryStore::with_quota(500);
    let cache = SessionCache::new(store.clone(), clock());
    let long_reason = "x".repeat(380);
    let mut entry = blacklisted("spam.ru");
    entry.reason = Some(long_reason);
    cache.set_cached_blacklist(&[entry]).unwrap();

    // Does not fit next to the blacklist, fits after clearing it
    let supplier = SupplierRecord {
        id: 1,
        name: "Ромашка".to_string(),
        ..Default::default()
    };
    cache.set_cached_suppliers(&[supplier]).unwrap();
    assert!(cache.get_cached_suppliers().is_some());
    assert!(cache.get_cached_blacklist().is_none());
}

#[test]
fn test_quota_failure_after_retry_is_returned() {
    let cache = SessionCache::new(MemoryStore::with_quota(16), clock());
    let err = cache.set_cached_suppliers(&[supplier(1)]).unwrap_err();
    assert!(matches!(err, StoreError::QuotaExceeded { .. }));
    assert!(cache.get_cached_suppliers().is_none());
}

#[test]
fn test_extraction_state_has_no_ttl() {
    let clock = clock();
    let cache = SessionCache::new(MemoryStore::new(), clock.clone());
    let mut results = BTreeMap::new();
    results.insert(
        "example.com".to_string(),
        ExtractionResult {
            domain: "example.com".to_string(),
            inn: Some("7707083893".to_string()),
            email: Some("info@example.com".to_string()),
            emails: Vec::new(),
            status: "success".to_string(),
            source_urls: Vec::new(),
            proof: None,
            error: None,
        },
    );
    cache
        .set_extraction_results(ExtractionKind::Inn, "run-1", &results)
        .unwrap();
    cache
        .set_extraction_job(ExtractionKind::Inn, "run-1", "job-9")
        .unwrap();

    clock.advance(TimeDelta::days(3));
    assert_eq!(cache.get_extraction_results(ExtractionKind::Inn, "run-1"), results);
    assert_eq!(
        cache.get_extraction_job(ExtractionKind::Inn, "run-1").as_deref(),
        Some("job-9")
    );
    assert!(cache
        .get_extraction_results(ExtractionKind::Comet, "run-1")
        .is_empty());
    assert!(cache.get_extraction_job(ExtractionKind::Inn, "run-2").is_none());

    cache.clear();
    assert_eq!(cache.get_extraction_results(ExtractionKind::Inn, "run-1").len(), 1);

    cache.clear_extraction_results(ExtractionKind::Inn, "run-1");
    cache.clear_extraction_job(ExtractionKind::Inn, "run-1");
    assert!(cache.get_extraction_results(ExtractionKind::Inn, "run-1").is_empty());
    assert!(cache.get_extraction_job(ExtractionKind::Inn, "run-1").is_none());
}

#[test]
fn test_memory_store_quota_counts_replaced_value_once() {
    let store = MemoryStore::with_quota(10);
    store.set("k", "123456789").unwrap();
    store.set("k", "987654321").unwrap();
    assert_eq!(store.used_bytes(), 10);
    assert!(matches!(
        store.set("j", "1"),
        Err(StoreError::QuotaExceeded {
            needed: 2,
            available: 0
        })
    ));
}

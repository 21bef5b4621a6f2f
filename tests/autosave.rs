//! Supplier auto-save against mock backend and registry servers.

mod helpers;

use std::collections::BTreeMap;

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::{api_client, checko_client, company_payload, envelope, extraction_result, supplier};
use supplier_desk::autosave::{AutoSaveOutcome, SupplierAutoSaver};
use supplier_desk::models::{ExtractionResult, SupplierRecord};

const INN: &str = "7707083893";
const OTHER_INN: &str = "500100732259";

fn results(items: Vec<ExtractionResult>) -> BTreeMap<String, ExtractionResult> {
    items
        .into_iter()
        .map(|r| (r.domain.clone(), r))
        .collect()
}

#[tokio::test]
async fn test_creates_updates_and_skips() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moderator/suppliers"))
        .and(body_partial_json(json!({
            "name": "Example.com",
            "domain": "example.com",
            "type": "supplier",
            "inn": INN,
            "email": "info@example.com"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 10,
            "name": "Example.com",
            "type": "supplier",
            "inn": INN,
            "email": "info@example.com",
            "domain": "example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/moderator/suppliers/5"))
        .and(body_json(json!({"email": "sales@known.ru"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "name": "Известный",
            "type": "supplier",
            "inn": OTHER_INN,
            "email": "sales@known.ru"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut failed = extraction_result("broken.ru", Some(INN), Some("x@broken.ru"));
    failed.status = "failed".to_string();
    let results = results(vec![
        extraction_result("shop.Example.com", Some(INN), Some("info@example.com")),
        extraction_result("known.ru", Some(OTHER_INN), Some("sales@known.ru")),
        extraction_result("noemail.ru", Some(INN), None),
        failed,
    ]);
    let existing = vec![supplier(5, "Известный", Some(OTHER_INN), None)];

    let api = api_client(&server);
    let mut saver = SupplierAutoSaver::new();
    let outcome = saver.run(&api, None, &results, &existing).await;
    assert_eq!(
        outcome,
        AutoSaveOutcome {
            created: 1,
            updated: 1,
            enriched: 0,
            skipped: 2,
            failed: 0,
        }
    );
    assert!(saver.has_fired());

    // Latched: the mocks above expect exactly one call each
    let again = saver.run(&api, None, &results, &existing).await;
    assert!(again.is_noop());
    assert_eq!(again, AutoSaveOutcome::default());
}

#[tokio::test]
async fn test_matches_by_root_domain_and_fills_inn() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/moderator/suppliers/7"))
        .and(body_json(json!({"inn": INN})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "name": "Пример",
            "type": "reseller",
            "inn": INN,
            "email": "a@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut existing = supplier(7, "Пример", None, Some("https://www.example.com"));
    existing.email = Some("a@example.com".to_string());
    let results = results(vec![extraction_result(
        "shop.example.com",
        Some(INN),
        Some("info@example.com"),
    )]);

    let outcome = SupplierAutoSaver::new()
        .run(&api_client(&server), None, &results, &[existing])
        .await;
    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.created, 0);
}

#[tokio::test]
async fn test_complete_enriched_supplier_is_left_alone() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let existing = SupplierRecord {
        email: Some("info@example.com".to_string()),
        checko_data: Some("{}".to_string()),
        ..supplier(3, "Пример", Some(INN), Some("example.com"))
    };
    let results = results(vec![
        extraction_result("example.com", Some(INN), Some("info@example.com")),
        extraction_result("www.example.com", Some(INN), Some("info@example.com")),
    ]);

    let outcome = SupplierAutoSaver::new()
        .run(&api_client(&server), None, &results, &[existing])
        .await;
    assert!(outcome.is_noop());
    assert_eq!(outcome.skipped, 2);
}

#[tokio::test]
async fn test_new_supplier_is_enriched_from_registry() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moderator/suppliers"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 10,
            "name": "Example.com",
            "type": "supplier",
            "inn": INN
        })))
        .expect(1)
        .mount(&backend)
        .await;
    Mock::given(method("PUT"))
        .and(path("/moderator/suppliers/10"))
        .and(body_partial_json(json!({
            "ogrn": "1027700132195",
            "companyStatus": "Действует"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10,
            "name": "ООО \"Ромашка\"",
            "type": "supplier"
        })))
        .expect(1)
        .mount(&backend)
        .await;

    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/company"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(company_payload(INN))))
        .mount(&registry)
        .await;

    let checko = checko_client(&registry);
    let results = results(vec![extraction_result(
        "example.com",
        Some(INN),
        Some("info@example.com"),
    )]);
    let outcome = SupplierAutoSaver::new()
        .run(&api_client(&backend), Some(&checko), &results, &[])
        .await;
    assert_eq!(outcome.created, 1);
    assert_eq!(outcome.enriched, 1);
    assert_eq!(outcome.failed, 0);
}

#[tokio::test]
async fn test_enrichment_failure_keeps_created_supplier() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moderator/suppliers"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 11,
            "name": "Example.com",
            "type": "supplier"
        })))
        .expect(1)
        .mount(&backend)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;

    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/company"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"message": "maintenance"})))
        .mount(&registry)
        .await;

    let checko = checko_client(&registry);
    let results = results(vec![extraction_result(
        "example.com",
        Some(INN),
        Some("info@example.com"),
    )]);
    let outcome = SupplierAutoSaver::new()
        .run(&api_client(&backend), Some(&checko), &results, &[])
        .await;
    assert_eq!(outcome.created, 1);
    assert_eq!(outcome.enriched, 0);
    assert_eq!(outcome.failed, 1);
}

#[tokio::test]
async fn test_reset_rearms_the_latch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moderator/suppliers"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 12,
            "name": "Example.com",
            "type": "supplier"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let api = api_client(&server);
    let results = results(vec![extraction_result(
        "example.com",
        Some(INN),
        Some("info@example.com"),
    )]);
    let mut saver = SupplierAutoSaver::new();
    assert_eq!(saver.run(&api, None, &results, &[]).await.created, 1);
    saver.reset();
    assert!(!saver.has_fired());
    assert_eq!(saver.run(&api, None, &results, &[]).await.created, 1);
}

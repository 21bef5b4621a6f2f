//! Registry snapshot assembly against a mock Checko server.

mod helpers;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::{checko_client, company_payload, envelope};
use supplier_desk::checko::enrichment_from_snapshot;
use supplier_desk::CheckoError;

const INN: &str = "7707083893";

async fn mount_resource(server: &MockServer, resource: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/{resource}")))
        .and(query_param("key", "secret"))
        .and(query_param("inn", INN))
        .respond_with(response)
        .mount(server)
        .await;
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(envelope(data))
}

#[tokio::test]
async fn test_full_snapshot() {
    let server = MockServer::start().await;
    mount_resource(&server, "company", ok(company_payload(INN))).await;
    mount_resource(
        &server,
        "finances",
        ok(json!({
            "2021": {"2110": 1000000, "2400": 50000},
            "2022": {"2110": "1 500 000", "2400": 70000},
            "2023": {"2110": 2000000, "2400": 90000}
        })),
    )
    .await;
    mount_resource(
        &server,
        "legal-cases",
        ok(json!({
            "ОбщКолич": 4,
            "ОбщСуммИск": 1200000,
            "Истец": {"Колич": 3},
            "Ответчик": {"Колич": 1}
        })),
    )
    .await;
    mount_resource(
        &server,
        "inspections",
        ok(json!({"ОбщКолич": 2, "Записи": [{"Нарушения": false}, {"Нарушения": false}]})),
    )
    .await;
    mount_resource(&server, "enforcements", ok(json!({"ОбщКолич": 0, "ОбщСумма": 0})))
        .await;

    let snapshot = checko_client(&server).fetch_snapshot(INN).await.unwrap();
    let company = snapshot.company.as_ref().unwrap();
    assert_eq!(company.inn.as_deref(), Some(INN));
    assert_eq!(company.status_name(), Some("Действует"));
    assert_eq!(snapshot.finances.latest().unwrap().0, 2023);
    assert_eq!(
        snapshot.finances.years().nth(1).unwrap().1.revenue,
        Some(1_500_000.0)
    );
    assert_eq!(snapshot.legal_cases.as_ref().unwrap().total_count, Some(4));
    assert_eq!(snapshot.inspections.as_ref().unwrap().with_violations(), 0);
    assert_eq!(snapshot.enforcements.as_ref().unwrap().count(), 0);
    assert!(snapshot.fetched_at.is_some());

    let update = enrichment_from_snapshot(&snapshot).unwrap();
    assert_eq!(update.ogrn.as_deref(), Some("1027700132195"));
    assert_eq!(update.company_status.as_deref(), Some("Действует"));
    assert_eq!(update.revenue, Some(2_000_000.0));
    assert_eq!(update.finance_year, Some(2023));
    assert_eq!(update.legal_cases_as_defendant, Some(1));
    assert!(update.checko_data.is_some());
}

#[tokio::test]
async fn test_optional_resources_degrade() {
    let server = MockServer::start().await;
    mount_resource(&server, "company", ok(company_payload(INN))).await;
    mount_resource(&server, "finances", ResponseTemplate::new(500)).await;
    mount_resource(
        &server,
        "legal-cases",
        ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "meta": {"status": "error", "message": "Лимит запросов исчерпан"}
        })),
    )
    .await;
    mount_resource(&server, "inspections", ok(json!(null))).await;
    // enforcements is not mounted: wiremock answers 404

    let snapshot = checko_client(&server).fetch_snapshot(INN).await.unwrap();
    assert!(snapshot.company.is_some());
    assert!(snapshot.finances.is_empty());
    assert!(snapshot.legal_cases.is_none());
    assert!(snapshot.inspections.is_none());
    assert!(snapshot.enforcements.is_none());
}

#[tokio::test]
async fn test_company_failure_is_fatal() {
    let server = MockServer::start().await;
    mount_resource(
        &server,
        "company",
        ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"status": "error", "message": "Неверный ключ"}
        })),
    )
    .await;
    mount_resource(&server, "finances", ok(json!({}))).await;

    let err = checko_client(&server).fetch_snapshot(INN).await.unwrap_err();
    match err {
        CheckoError::Company(api) => assert_eq!(api.message(), "Неверный ключ"),
        other => panic!("expected a company error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_company_is_not_found() {
    let server = MockServer::start().await;
    mount_resource(&server, "company", ok(json!({"НаимСокр": null}))).await;

    let err = checko_client(&server).fetch_snapshot(INN).await.unwrap_err();
    assert!(matches!(err, CheckoError::NotFound(ref inn) if inn == INN));
}

#[tokio::test]
async fn test_invalid_inn_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = checko_client(&server).fetch_snapshot("12345").await.unwrap_err();
    assert!(matches!(err, CheckoError::InvalidInn(_)));
}

// Shared fixtures for the integration tests.
//
// Each test binary pulls this in with `mod helpers;`, so not every helper is
// used everywhere.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::MockServer;

use supplier_desk::api::ApiClient;
use supplier_desk::checko::CheckoClient;
use supplier_desk::models::{ExtractionResult, SupplierRecord};

/// Backend client pointed at a mock server.
pub fn api_client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), reqwest::Client::new()).expect("mock server URI is valid")
}

/// Registry client pointed at a mock server, with key `secret`.
pub fn checko_client(server: &MockServer) -> CheckoClient {
    CheckoClient::new(reqwest::Client::new(), &server.uri(), "secret")
}

pub fn supplier(id: i64, name: &str, inn: Option<&str>, domain: Option<&str>) -> SupplierRecord {
    SupplierRecord {
        id,
        name: name.to_string(),
        inn: inn.map(str::to_string),
        domain: domain.map(str::to_string),
        ..Default::default()
    }
}

pub fn extraction_result(domain: &str, inn: Option<&str>, email: Option<&str>) -> ExtractionResult {
    ExtractionResult {
        domain: domain.to_string(),
        inn: inn.map(str::to_string),
        email: email.map(str::to_string),
        emails: Vec::new(),
        status: "success".to_string(),
        source_urls: vec![format!("https://{domain}/contacts")],
        proof: None,
        error: None,
    }
}

/// Checko envelope around `data`.
pub fn envelope(data: Value) -> Value {
    json!({"data": data, "meta": {"status": "ok"}})
}

pub fn company_payload(inn: &str) -> Value {
    json!({
        "ОГРН": "1027700132195",
        "ИНН": inn,
        "КПП": "773601001",
        "НаимСокр": "ООО \"Ромашка\"",
        "ДатаРег": "2009-05-14",
        "Статус": {"Код": "001", "Наим": "Действует"},
        "ЮрАдрес": {"АдресРФ": "г. Москва, ул. Ленина, д. 1"}
    })
}

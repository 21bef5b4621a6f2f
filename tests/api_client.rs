//! Backend client behavior against a mock server.

mod helpers;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::api_client;
use supplier_desk::api::{ApiClient, DomainQueueQuery};
use supplier_desk::models::{
    ExtractionKind, JobStatus, NewBlacklistEntry, StartExtraction, SupplierType,
};
use supplier_desk::ApiError;

#[tokio::test]
async fn test_post_sends_json_with_charset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moderator/blacklist"))
        .and(header("content-type", "application/json; charset=utf-8"))
        .and(body_json(json!({"domain": "spam.ru", "reason": "дорвей"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "domain": "spam.ru",
            "reason": "дорвей",
            "addedAt": "2024-03-01T10:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let entry = api_client(&server)
        .add_to_blacklist(&NewBlacklistEntry {
            domain: "spam.ru".to_string(),
            reason: Some("дорвей".to_string()),
            added_by: None,
            parsing_run_id: None,
        })
        .await
        .unwrap();
    assert_eq!(entry.domain, "spam.ru");
    assert_eq!(entry.added_at.as_deref(), Some("2024-03-01T10:00:00"));
}

#[tokio::test]
async fn test_delete_no_content_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/moderator/blacklist/spam.ru"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    api_client(&server)
        .remove_from_blacklist("spam.ru")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_error_detail_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/parsing/runs/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Run not found"})))
        .mount(&server)
        .await;

    let err = api_client(&server).get_run("missing").await.unwrap_err();
    assert_eq!(err.status(), 404);
    assert_eq!(err.message(), "Run not found");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_plain_text_error_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/keywords"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = api_client(&server).list_keywords().await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Http {
            status: 502,
            message: "HTTP 502".to_string(),
        }
    );
    assert_eq!(err.to_string(), "HTTP 502 (HTTP 502)");
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    // Nothing listens on port 1
    let client = ApiClient::new("http://127.0.0.1:1", reqwest::Client::new()).unwrap();
    let err = client.list_blacklist().await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(err.status(), 503);
}

#[tokio::test]
async fn test_wrapped_and_bare_lists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/moderator/suppliers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "suppliers": [
                {"id": 1, "name": "Ромашка", "type": "supplier", "inn": "7707083893"},
                {"id": 2, "name": "Лютик", "type": "reseller", "company_status": "Действует"}
            ],
            "total": 2
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/moderator/blacklist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"domain": "spam.ru"}])))
        .mount(&server)
        .await;

    let client = api_client(&server);
    let suppliers = client.list_suppliers().await.unwrap();
    assert_eq!(suppliers.len(), 2);
    assert_eq!(suppliers[1].company_status.as_deref(), Some("Действует"));
    assert_eq!(client.list_blacklist().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_domain_queue_filters_by_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domains/queue"))
        .and(query_param("parsingRunId", "run-7"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [{
                "domain": "shop.example.com",
                "url": "https://shop.example.com/1",
                "keyword": "кирпич",
                "source": "google",
                "status": "pending",
                "createdAt": "2024-03-01T10:00:00"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = DomainQueueQuery {
        limit: Some(100),
        ..DomainQueueQuery::for_run("run-7")
    };
    let entries = api_client(&server).domain_queue(&query).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].domain, "shop.example.com");
}

#[tokio::test]
async fn test_run_bundle_survives_missing_logs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/parsing/runs/run-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "runId": "run-7",
            "keyword": "кирпич",
            "status": "completed",
            "createdAt": "2024-03-01T10:00:00",
            "resultsCount": 2
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/domains/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"domain": "a.example.com", "url": "http://a.example.com/1"},
            {"domain": "www.example.com", "url": "http://example.com/2"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/parsing/run-7/logs"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "log store down"})))
        .mount(&server)
        .await;

    let bundle = api_client(&server).fetch_run_bundle("run-7").await.unwrap();
    assert_eq!(bundle.run.status, JobStatus::Completed);
    assert_eq!(bundle.queue.len(), 2);
    assert!(bundle.logs.is_none());
}

#[tokio::test]
async fn test_run_bundle_requires_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/parsing/runs/run-7"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Run not found"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/domains/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = api_client(&server).fetch_run_bundle("run-7").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_extraction_job_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/domain-parser/extract-batch"))
        .and(body_json(json!({"runId": "run-7", "domains": ["example.com"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job_id": "job-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/domain-parser/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobId": "job-1",
            "status": "running",
            "processed": 1,
            "total": 3,
            "results": [{
                "domain": "example.com",
                "inn": "7707083893",
                "emails": ["info@example.com"],
                "status": "completed"
            }]
        })))
        .mount(&server)
        .await;

    let client = api_client(&server);
    let started = client
        .start_extraction(
            ExtractionKind::DomainParser,
            &StartExtraction {
                run_id: "run-7".to_string(),
                domains: vec!["example.com".to_string()],
            },
        )
        .await
        .unwrap();
    assert_eq!(started.job_id, "job-1");

    let job = client
        .extraction_status(ExtractionKind::DomainParser, &started.job_id)
        .await
        .unwrap();
    assert_eq!(job.status, JobStatus::Running);
    assert_eq!((job.processed, job.total), (1, 3));
    assert!(job.results[0].is_success());
    assert_eq!(job.results[0].primary_email(), Some("info@example.com"));
}

#[tokio::test]
async fn test_keyword_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/keywords"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "keywords": [
                {"id": 1, "keyword": "кирпич", "created_at": "2024-03-01T10:00:00"},
                {"id": 2, "keyword": "цемент"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/keywords"))
        .and(body_json(json!({"keyword": "песок"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": 3, "keyword": "песок"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/keywords/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_client(&server);
    let keywords = client.list_keywords().await.unwrap();
    assert_eq!(keywords.len(), 2);
    assert_eq!(keywords[0].created_at.as_deref(), Some("2024-03-01T10:00:00"));
    assert_eq!(keywords[1].keyword, "цемент");

    let saved = client.add_keyword("песок").await.unwrap();
    assert_eq!(saved.id, 3);
    client.delete_keyword(saved.id).await.unwrap();
}

#[tokio::test]
async fn test_list_runs_passes_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/parsing/runs"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "runs": [
                {"run_id": "run-8", "keyword": "цемент", "status": "running"},
                {"id": "run-7", "keyword": "кирпич", "status": "completed", "results_count": 12}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let runs = api_client(&server).list_runs(Some(2)).await.unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].status, JobStatus::Running);
    assert_eq!(runs[1].run_id, "run-7");
    assert_eq!(runs[1].results_count, Some(12));
}

#[tokio::test]
async fn test_get_supplier_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/moderator/suppliers/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "name": "Ромашка",
            "type": "reseller",
            "inn": "7707083893",
            "domain": "example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/moderator/suppliers/43"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Supplier not found"})),
        )
        .mount(&server)
        .await;

    let client = api_client(&server);
    let supplier = client.get_supplier(42).await.unwrap();
    assert_eq!(supplier.name, "Ромашка");
    assert_eq!(supplier.supplier_type, SupplierType::Reseller);
    assert_eq!(supplier.inn.as_deref(), Some("7707083893"));

    let err = client.get_supplier(43).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.message(), "Supplier not found");
}

//! Polling a batch extraction job over HTTP.

mod helpers;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::api_client;
use supplier_desk::models::ExtractionKind;
use supplier_desk::polling::{JobPoller, JobState};

const TICK: Duration = Duration::from_millis(20);

fn status(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

#[tokio::test]
async fn test_polls_until_completed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/inn-extraction/status/job-1"))
        .respond_with(status(json!({
            "jobId": "job-1",
            "status": "running",
            "processed": 1,
            "total": 2
        })))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/inn-extraction/status/job-1"))
        .respond_with(status(json!({
            "jobId": "job-1",
            "status": "completed",
            "processed": 2,
            "total": 2,
            "results": [
                {"domain": "a.ru", "inn": "7707083893", "email": "a@a.ru", "status": "success"},
                {"domain": "b.ru", "status": "failed", "error": "no contacts page"}
            ]
        })))
        .mount(&server)
        .await;

    let api = api_client(&server);
    let mut handle = JobPoller::new("INN extraction")
        .with_interval(TICK)
        .start(move || {
            let api = api.clone();
            async move { api.extraction_status(ExtractionKind::Inn, "job-1").await }
        });

    let update = tokio::time::timeout(Duration::from_secs(5), handle.wait())
        .await
        .unwrap();
    assert_eq!(update.state, JobState::Completed);
    assert_eq!(update.attempts, 3);
    let report = update.report.unwrap();
    assert_eq!(report.results.len(), 2);
    assert!(report.results[0].is_success());
    assert!(!report.results[1].is_success());
}

#[tokio::test]
async fn test_backend_errors_do_not_stop_polling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/comet/status/job-2"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/comet/status/job-2"))
        .respond_with(status(json!({
            "jobId": "job-2",
            "status": "failed",
            "error": "agent crashed"
        })))
        .mount(&server)
        .await;

    let api = api_client(&server);
    let mut handle = JobPoller::new("comet extraction")
        .with_interval(TICK)
        .start(move || {
            let api = api.clone();
            async move { api.extraction_status(ExtractionKind::Comet, "job-2").await }
        });

    let update = tokio::time::timeout(Duration::from_secs(5), handle.wait())
        .await
        .unwrap();
    assert_eq!(update.state, JobState::Failed("agent crashed".to_string()));
    assert_eq!(update.attempts, 3);
}

#[tokio::test]
async fn test_stop_ends_polling_of_a_running_job() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domain-parser/status/job-3"))
        .respond_with(status(json!({
            "jobId": "job-3",
            "status": "running",
            "processed": 0,
            "total": 10
        })))
        .mount(&server)
        .await;

    let api = api_client(&server);
    let mut handle = JobPoller::new("domain parser")
        .with_interval(TICK)
        .start(move || {
            let api = api.clone();
            async move { api.extraction_status(ExtractionKind::DomainParser, "job-3").await }
        });

    let first = handle.changed().await.unwrap();
    assert_eq!(
        first.state,
        JobState::Running {
            processed: 0,
            total: 10
        }
    );

    let last = tokio::time::timeout(Duration::from_secs(5), handle.stop())
        .await
        .unwrap();
    assert!(!last.state.is_terminal());

    let seen = server.received_requests().await.unwrap().len();
    tokio::time::sleep(TICK * 5).await;
    assert_eq!(server.received_requests().await.unwrap().len(), seen);
}

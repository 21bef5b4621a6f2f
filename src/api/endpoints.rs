//! Typed wrappers over the backend endpoints used by the moderation workflow.

use log::warn;
use serde::Serialize;
use url::form_urlencoded::byte_serialize;

use super::client::ApiClient;
use crate::error_handling::ApiError;
use crate::models::{
    BlacklistEntry, DomainQueueEntry, ExtractionJob, ExtractionJobStarted, ExtractionKind, Keyword,
    NewBlacklistEntry, NewSupplier, ParsingLogs, ParsingLogsResponse, ParsingRun, StartExtraction,
    StartParsing, SupplierRecord, SupplierUpdate,
};

/// Percent-encodes one path segment.
fn segment(value: &str) -> String {
    // form encoding turns spaces into '+'; literal '+' is already %2B
    byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Filters of `GET /domains/queue`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainQueueQuery {
    pub parsing_run_id: Option<String>,
    pub keyword: Option<String>,
    pub status: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl DomainQueueQuery {
    /// Whole queue of one run.
    pub fn for_run(run_id: &str) -> Self {
        Self {
            parsing_run_id: Some(run_id.to_string()),
            ..Default::default()
        }
    }

    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(run_id) = &self.parsing_run_id {
            pairs.push(("parsingRunId", run_id.clone()));
        }
        if let Some(keyword) = &self.keyword {
            pairs.push(("keyword", keyword.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}

#[derive(Serialize)]
struct NewKeyword<'a> {
    keyword: &'a str,
}

/// Everything the run view loads at once.
#[derive(Debug, Clone)]
pub struct RunBundle {
    pub run: ParsingRun,
    pub queue: Vec<DomainQueueEntry>,
    /// `None` when the run has no logs or the logs request failed
    pub logs: Option<ParsingLogs>,
}

impl ApiClient {
    // Blacklist

    /// `GET /moderator/blacklist`
    pub async fn list_blacklist(&self) -> Result<Vec<BlacklistEntry>, ApiError> {
        self.get_list("/moderator/blacklist", &[], &["entries", "items", "blacklist"])
            .await
    }

    /// `POST /moderator/blacklist`
    pub async fn add_to_blacklist(
        &self,
        entry: &NewBlacklistEntry,
    ) -> Result<BlacklistEntry, ApiError> {
        self.post("/moderator/blacklist", entry).await
    }

    /// `DELETE /moderator/blacklist/{domain}`
    pub async fn remove_from_blacklist(&self, domain: &str) -> Result<(), ApiError> {
        self.delete(&format!("/moderator/blacklist/{}", segment(domain)))
            .await
    }

    // Keywords

    /// `GET /keywords`
    pub async fn list_keywords(&self) -> Result<Vec<Keyword>, ApiError> {
        self.get_list("/keywords", &[], &["keywords", "items"]).await
    }

    /// `POST /keywords`
    pub async fn add_keyword(&self, keyword: &str) -> Result<Keyword, ApiError> {
        self.post("/keywords", &NewKeyword { keyword }).await
    }

    /// `DELETE /keywords/{id}`
    pub async fn delete_keyword(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/keywords/{id}")).await
    }

    // Parsing runs

    /// `POST /parsing/start`
    pub async fn start_parsing(&self, request: &StartParsing) -> Result<ParsingRun, ApiError> {
        self.post("/parsing/start", request).await
    }

    /// `GET /parsing/runs`
    pub async fn list_runs(&self, limit: Option<u32>) -> Result<Vec<ParsingRun>, ApiError> {
        let query: Vec<(&str, String)> = limit
            .map(|l| ("limit", l.to_string()))
            .into_iter()
            .collect();
        self.get_list("/parsing/runs", &query, &["runs", "items"]).await
    }

    /// `GET /parsing/runs/{id}`
    pub async fn get_run(&self, run_id: &str) -> Result<ParsingRun, ApiError> {
        self.get(&format!("/parsing/runs/{}", segment(run_id)), &[])
            .await
    }

    /// `GET /parsing/{runId}/logs`; `None` when the run recorded no logs.
    pub async fn get_parsing_logs(&self, run_id: &str) -> Result<Option<ParsingLogs>, ApiError> {
        let response: ParsingLogsResponse = self
            .get(&format!("/parsing/{}/logs", segment(run_id)), &[])
            .await?;
        Ok(response.parsing_logs)
    }

    // Domain queue

    /// `GET /domains/queue`
    pub async fn domain_queue(
        &self,
        query: &DomainQueueQuery,
    ) -> Result<Vec<DomainQueueEntry>, ApiError> {
        self.get_list(
            "/domains/queue",
            &query.to_pairs(),
            &["entries", "items", "domains"],
        )
        .await
    }

    /// Loads run metadata, queue and logs concurrently.
    ///
    /// Run and queue are required; a failing logs request only drops the
    /// logs, which makes source reconciliation fall back to URL tags.
    pub async fn fetch_run_bundle(&self, run_id: &str) -> Result<RunBundle, ApiError> {
        let queue_query = DomainQueueQuery::for_run(run_id);
        let (run, queue, logs) = tokio::join!(
            self.get_run(run_id),
            self.domain_queue(&queue_query),
            self.get_parsing_logs(run_id),
        );
        let logs = match logs {
            Ok(logs) => logs,
            Err(e) => {
                warn!("Parsing logs unavailable for run {}: {}", run_id, e);
                None
            }
        };
        Ok(RunBundle {
            run: run?,
            queue: queue?,
            logs,
        })
    }

    // Suppliers

    /// `GET /moderator/suppliers`
    pub async fn list_suppliers(&self) -> Result<Vec<SupplierRecord>, ApiError> {
        self.get_list("/moderator/suppliers", &[], &["suppliers", "items"])
            .await
    }

    /// `GET /moderator/suppliers/{id}`
    pub async fn get_supplier(&self, id: i64) -> Result<SupplierRecord, ApiError> {
        self.get(&format!("/moderator/suppliers/{id}"), &[]).await
    }

    /// `POST /moderator/suppliers`
    pub async fn create_supplier(
        &self,
        supplier: &NewSupplier,
    ) -> Result<SupplierRecord, ApiError> {
        self.post("/moderator/suppliers", supplier).await
    }

    /// `PUT /moderator/suppliers/{id}`
    pub async fn update_supplier(
        &self,
        id: i64,
        update: &SupplierUpdate,
    ) -> Result<SupplierRecord, ApiError> {
        self.put(&format!("/moderator/suppliers/{id}"), update).await
    }

    // Batch extraction

    /// `POST /{prefix}/extract-batch`
    pub async fn start_extraction(
        &self,
        kind: ExtractionKind,
        request: &StartExtraction,
    ) -> Result<ExtractionJobStarted, ApiError> {
        self.post(&format!("/{}/extract-batch", kind.path_prefix()), request)
            .await
    }

    /// `GET /{prefix}/status/{jobId}`
    pub async fn extraction_status(
        &self,
        kind: ExtractionKind,
        job_id: &str,
    ) -> Result<ExtractionJob, ApiError> {
        self.get(
            &format!("/{}/status/{}", kind.path_prefix(), segment(job_id)),
            &[],
        )
        .await
    }
}

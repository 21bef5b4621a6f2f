//! Wire and domain types shared by the backend client, the domain grouping
//! logic, the risk scoring and the session cache.
//!
//! Field names follow the backend's camelCase JSON; snake_case aliases are
//! accepted for the fields older endpoints still return that way.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumIter};

/// Search engine tag attached to a crawled URL by the crawler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    /// Found by Google only
    Google,
    /// Found by Yandex only
    Yandex,
    /// Found by both engines
    Both,
    /// Any tag this client does not know
    #[serde(other)]
    #[value(skip)]
    Unknown,
}

/// A search engine in the closed result set of source reconciliation.
///
/// Ordering is `Google < Yandex`, which is the ascending order of the
/// lower-case names.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchEngine {
    /// google
    Google,
    /// yandex
    Yandex,
}

/// Lifecycle status of a parsing run or a batch extraction job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, not started yet
    Pending,
    /// In progress
    Running,
    /// Finished successfully
    Completed,
    /// Finished with an error
    Failed,
    /// Any status value this client does not know
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// `completed` and `failed` end a job; everything else keeps polling alive.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// One crawled URL as returned by `GET /domains/queue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainQueueEntry {
    /// Host the URL belongs to (not necessarily the root domain)
    pub domain: String,
    /// Full crawled URL
    pub url: String,
    /// Keyword of the run that found it
    #[serde(default)]
    pub keyword: String,
    /// Engine tag set by the crawler
    #[serde(default)]
    pub source: Option<SearchSource>,
    /// Queue status (`pending`, `processed`, ...)
    #[serde(default)]
    pub status: String,
    /// Creation timestamp as sent by the backend
    #[serde(default, alias = "created_at")]
    pub created_at: String,
    /// Run that produced the entry
    #[serde(default, alias = "parsing_run_id", skip_serializing_if = "Option::is_none")]
    pub parsing_run_id: Option<String>,
}

/// A crawled URL inside a [`DomainGroup`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainUrl {
    pub url: String,
    pub keyword: String,
    pub source: Option<SearchSource>,
    pub status: String,
    pub created_at: String,
}

impl From<&DomainQueueEntry> for DomainUrl {
    fn from(entry: &DomainQueueEntry) -> Self {
        DomainUrl {
            url: entry.url.clone(),
            keyword: entry.keyword.clone(),
            source: entry.source,
            status: entry.status.clone(),
            created_at: entry.created_at.clone(),
        }
    }
}

/// All crawled URLs sharing one root domain.
///
/// Built fresh on every load and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainGroup {
    /// Root domain in the display casing of the first entry seen
    pub domain: String,
    /// URLs in input order
    pub urls: Vec<DomainUrl>,
    /// Number of URLs in the group
    pub total_urls: usize,
    /// Classification of the matching supplier, if any
    pub supplier_type: Option<SupplierType>,
    /// Id of the matching supplier, if any
    pub supplier_id: Option<i64>,
    /// Engines that surfaced the domain, sorted and deduplicated
    pub sources: Vec<SearchEngine>,
}

/// Supplier classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SupplierType {
    /// Manufacturer or primary supplier
    #[default]
    Supplier,
    /// Reseller of someone else's goods
    Reseller,
}

/// A persisted supplier with its core and enrichment fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplierRecord {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub supplier_type: SupplierType,

    // Registry enrichment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ogrn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub okpo: Option<String>,
    #[serde(alias = "company_status", skip_serializing_if = "Option::is_none")]
    pub company_status: Option<String>,
    #[serde(alias = "registration_date", skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
    #[serde(alias = "legal_address", skip_serializing_if = "Option::is_none")]
    pub legal_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(alias = "authorized_capital", skip_serializing_if = "Option::is_none")]
    pub authorized_capital: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    #[serde(alias = "finance_year", skip_serializing_if = "Option::is_none")]
    pub finance_year: Option<i32>,
    #[serde(alias = "legal_cases_count", skip_serializing_if = "Option::is_none")]
    pub legal_cases_count: Option<u64>,
    #[serde(alias = "legal_cases_sum", skip_serializing_if = "Option::is_none")]
    pub legal_cases_sum: Option<f64>,
    #[serde(alias = "legal_cases_as_plaintiff", skip_serializing_if = "Option::is_none")]
    pub legal_cases_as_plaintiff: Option<u64>,
    #[serde(alias = "legal_cases_as_defendant", skip_serializing_if = "Option::is_none")]
    pub legal_cases_as_defendant: Option<u64>,
    /// Serialized registry snapshot
    #[serde(alias = "checko_data", skip_serializing_if = "Option::is_none")]
    pub checko_data: Option<String>,

    #[serde(alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(alias = "updated_at", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Body of `POST /moderator/suppliers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplier {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub supplier_type: SupplierType,
}

/// Body of `PUT /moderator/suppliers/{id}`; only present fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub supplier_type: Option<SupplierType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ogrn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub okpo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_capital: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finance_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_cases_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_cases_sum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_cases_as_plaintiff: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_cases_as_defendant: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checko_data: Option<String>,
}

impl SupplierUpdate {
    /// True when the update would not change anything.
    pub fn is_empty(&self) -> bool {
        *self == SupplierUpdate::default()
    }
}

/// A blacklisted root domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistEntry {
    /// Root domain
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, alias = "added_by", skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    #[serde(default, alias = "added_at", skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
    #[serde(default, alias = "parsing_run_id", skip_serializing_if = "Option::is_none")]
    pub parsing_run_id: Option<String>,
}

/// Body of `POST /moderator/blacklist`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlacklistEntry {
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsing_run_id: Option<String>,
}

/// A saved search keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    pub id: i64,
    pub keyword: String,
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body of `POST /parsing/start`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartParsing {
    pub keyword: String,
    /// Result pages to crawl per engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    /// Restrict the run to one engine (`both` by default on the backend)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SearchSource>,
}

/// A crawl run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsingRun {
    #[serde(alias = "run_id", alias = "id")]
    pub run_id: String,
    #[serde(default)]
    pub keyword: String,
    pub status: JobStatus,
    #[serde(default, alias = "created_at")]
    pub created_at: String,
    #[serde(default, alias = "finished_at", skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    #[serde(default, alias = "results_count", skip_serializing_if = "Option::is_none")]
    pub results_count: Option<u64>,
    /// Free-form crawler log
    #[serde(default, alias = "process_log", skip_serializing_if = "Option::is_none")]
    pub process_log: Option<Value>,
}

/// Links each engine returned during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineLog {
    #[serde(default, alias = "lastLinks")]
    pub last_links: Vec<String>,
}

/// Per-engine crawl logs of a run, the authoritative source record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsingLogs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google: Option<EngineLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yandex: Option<EngineLog>,
}

impl ParsingLogs {
    /// Log of one engine, if the run recorded one.
    pub fn engine(&self, engine: SearchEngine) -> Option<&EngineLog> {
        match engine {
            SearchEngine::Google => self.google.as_ref(),
            SearchEngine::Yandex => self.yandex.as_ref(),
        }
    }
}

/// Response of `GET /parsing/{runId}/logs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsingLogsResponse {
    #[serde(default, alias = "run_id")]
    pub run_id: Option<String>,
    #[serde(default, alias = "parsing_logs")]
    pub parsing_logs: Option<ParsingLogs>,
}

/// Batch extraction pipelines exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, clap::ValueEnum)]
#[strum(serialize_all = "snake_case")]
pub enum ExtractionKind {
    /// INN + email extraction from site pages
    Inn,
    /// Comet agent extraction
    Comet,
    /// Domain parser extraction
    DomainParser,
}

impl ExtractionKind {
    /// Path prefix of the kind's start/status endpoints.
    pub fn path_prefix(&self) -> &'static str {
        match self {
            ExtractionKind::Inn => "inn-extraction",
            ExtractionKind::Comet => "comet",
            ExtractionKind::DomainParser => "domain-parser",
        }
    }
}

/// Result of one extraction job for one domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionResult {
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<String>,
    pub status: String,
    #[serde(alias = "source_urls", skip_serializing_if = "Vec::is_empty")]
    pub source_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    /// `email`, or the first of `emails` when the variant returns a list.
    pub fn primary_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .or_else(|| self.emails.first().map(String::as_str))
            .filter(|e| !e.trim().is_empty())
    }

    /// Extractors report `success` (INN, comet) or `completed` (domain parser).
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success") || self.status.eq_ignore_ascii_case("completed")
    }
}

/// Body of `POST /{prefix}/extract-batch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartExtraction {
    pub run_id: String,
    pub domains: Vec<String>,
}

/// Response of `POST /{prefix}/extract-batch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionJobStarted {
    #[serde(alias = "job_id", alias = "id")]
    pub job_id: String,
}

/// Response of `GET /{prefix}/status/{jobId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionJob {
    #[serde(alias = "job_id")]
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub processed: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub results: Vec<ExtractionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

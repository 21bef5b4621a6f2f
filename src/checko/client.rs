//! Checko API client.

use std::sync::LazyLock;

use chrono::Utc;
use log::{debug, warn};
use regex::Regex;
use reqwest::Method;
use serde::de::DeserializeOwned;

use super::types::{
    CheckoSnapshot, CompanyInfo, Enforcements, Envelope, Finances, Inspections, LegalCases,
};
use crate::api::{decode, read_response};
use crate::config::Config;
use crate::error_handling::{categorize_reqwest_error, ApiError, CheckoError};

// 10 digits for legal entities, 12 for individual entrepreneurs
#[allow(clippy::expect_used)] // Static pattern, verified by tests
static INN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}(\d{2})?$").expect("valid INN pattern"));

/// True for a syntactically valid INN (10 or 12 digits).
pub fn is_valid_inn(inn: &str) -> bool {
    INN_PATTERN.is_match(inn.trim())
}

/// Registry sub-resources fetched for one company.
const COMPANY: &str = "company";
const FINANCES: &str = "finances";
const LEGAL_CASES: &str = "legal-cases";
const INSPECTIONS: &str = "inspections";
const ENFORCEMENTS: &str = "enforcements";

/// Client of the Checko company-registry API.
#[derive(Debug, Clone)]
pub struct CheckoClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CheckoClient {
    /// Creates a client; the key is sent as the `key` query parameter.
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Creates a client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns `CheckoError::MissingApiKey` when no key is configured.
    pub fn from_config(config: &Config, http: reqwest::Client) -> Result<Self, CheckoError> {
        let key = config
            .checko_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(CheckoError::MissingApiKey)?;
        Ok(Self::new(http, &config.checko_base_url, key))
    }

    /// Fetches one sub-resource and decodes its `data` member.
    ///
    /// `Ok(None)` means the registry has no data for this resource.
    async fn resource<T: DeserializeOwned>(
        &self,
        resource: &str,
        inn: &str,
    ) -> Result<Option<T>, ApiError> {
        let url = format!("{}/{}", self.base_url, resource);
        debug!("GET {} inn={}", url, inn);
        let response = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("inn", inn)])
            .send()
            .await
            .map_err(|e| categorize_reqwest_error(&e))?;

        let (status, value) = read_response(response, &Method::GET).await?;
        let envelope: Envelope = decode(status, value)?;

        if let Some(meta) = &envelope.meta {
            if meta.status.as_deref() == Some("error") {
                return Err(ApiError::Http {
                    status: status.as_u16(),
                    message: meta
                        .message
                        .clone()
                        .unwrap_or_else(|| format!("Checko {resource} request failed")),
                });
            }
        }

        match envelope.data {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(data) => decode(status, data).map(Some),
        }
    }

    /// Builds a registry snapshot for `inn`.
    ///
    /// The five sub-resources are requested concurrently. Only the `company`
    /// lookup is required; the others degrade to empty data with a warning.
    ///
    /// # Errors
    ///
    /// - `CheckoError::InvalidInn` if `inn` is not 10 or 12 digits
    /// - `CheckoError::Company` if the company request fails
    /// - `CheckoError::NotFound` if the registry has no such company
    pub async fn fetch_snapshot(&self, inn: &str) -> Result<CheckoSnapshot, CheckoError> {
        let inn = inn.trim();
        if !is_valid_inn(inn) {
            return Err(CheckoError::InvalidInn(inn.to_string()));
        }

        let (company, finances, legal_cases, inspections, enforcements) = tokio::join!(
            self.resource::<CompanyInfo>(COMPANY, inn),
            self.resource::<Finances>(FINANCES, inn),
            self.resource::<LegalCases>(LEGAL_CASES, inn),
            self.resource::<Inspections>(INSPECTIONS, inn),
            self.resource::<Enforcements>(ENFORCEMENTS, inn),
        );

        let company = company
            .map_err(CheckoError::Company)?
            .filter(CompanyInfo::is_identified)
            .ok_or_else(|| CheckoError::NotFound(inn.to_string()))?;

        Ok(CheckoSnapshot {
            company: Some(company),
            finances: optional(FINANCES, inn, finances).unwrap_or_default(),
            legal_cases: optional(LEGAL_CASES, inn, legal_cases),
            inspections: optional(INSPECTIONS, inn, inspections),
            enforcements: optional(ENFORCEMENTS, inn, enforcements),
            rating: None,
            fetched_at: Some(Utc::now().to_rfc3339()),
        })
    }
}

fn optional<T>(resource: &str, inn: &str, result: Result<Option<T>, ApiError>) -> Option<T> {
    match result {
        Ok(data) => data,
        Err(e) => {
            warn!("Checko {} unavailable for INN {}: {}", resource, inn, e);
            None
        }
    }
}

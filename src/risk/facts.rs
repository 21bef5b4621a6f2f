//! Resolution of scoring inputs from a supplier record and a registry snapshot.

use chrono::{Datelike, NaiveDate};

use crate::checko::CheckoSnapshot;
use crate::config::INACTIVE_STATUS_MARKERS;
use crate::models::SupplierRecord;
use crate::utils::parse_date;

/// Flat, typed inputs shared by every risk strategy.
///
/// Record fields win over snapshot fields; a snapshot field is used only
/// when the record does not carry the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyFacts {
    pub company_status: Option<String>,
    pub registration_date: Option<NaiveDate>,
    /// `(year, revenue)` in ascending year order
    pub revenue_by_year: Vec<(i32, Option<f64>)>,
    pub legal_cases_count: u64,
    pub legal_cases_sum: f64,
    pub legal_cases_as_plaintiff: u64,
    pub legal_cases_as_defendant: u64,
    /// Zero when the registry returned no enforcement data
    pub enforcements_count: u64,
    pub enforcements_sum: f64,
    pub inspections_count: u64,
    pub inspections_with_violations: u64,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl CompanyFacts {
    /// Resolves facts from an optional snapshot and an optional record.
    ///
    /// Without an explicit snapshot the record's `checko_data` blob is
    /// parsed; a malformed blob counts as no snapshot.
    pub fn resolve(snapshot: Option<&CheckoSnapshot>, record: Option<&SupplierRecord>) -> Self {
        let parsed;
        let snapshot = match snapshot {
            Some(s) => Some(s),
            None => {
                parsed = record
                    .and_then(|r| r.checko_data.as_deref())
                    .and_then(CheckoSnapshot::parse_lenient);
                parsed.as_ref()
            }
        };

        let company = snapshot.and_then(|s| s.company.as_ref());
        let cases = snapshot.and_then(|s| s.legal_cases.as_ref());
        let inspections = snapshot.and_then(|s| s.inspections.as_ref());
        let enforcements = snapshot.and_then(|s| s.enforcements.as_ref());

        let company_status = non_empty(record.and_then(|r| r.company_status.as_deref()))
            .or_else(|| non_empty(company.and_then(|c| c.status_name())))
            .map(str::to_string);

        let registration_date = record
            .and_then(|r| r.registration_date.as_deref())
            .and_then(parse_date)
            .or_else(|| {
                company
                    .and_then(|c| c.registration_date.as_deref())
                    .and_then(parse_date)
            });

        let revenue_by_year = snapshot
            .map(|s| s.finances.years().map(|(y, f)| (y, f.revenue)).collect())
            .unwrap_or_default();

        CompanyFacts {
            company_status,
            registration_date,
            revenue_by_year,
            legal_cases_count: record
                .and_then(|r| r.legal_cases_count)
                .or_else(|| cases.and_then(|c| c.total_count))
                .unwrap_or(0),
            legal_cases_sum: record
                .and_then(|r| r.legal_cases_sum)
                .or_else(|| cases.and_then(|c| c.total_claim_sum))
                .unwrap_or(0.0),
            legal_cases_as_plaintiff: record
                .and_then(|r| r.legal_cases_as_plaintiff)
                .or_else(|| cases.and_then(|c| c.as_plaintiff.as_ref()).and_then(|s| s.count))
                .unwrap_or(0),
            legal_cases_as_defendant: record
                .and_then(|r| r.legal_cases_as_defendant)
                .or_else(|| cases.and_then(|c| c.as_defendant.as_ref()).and_then(|s| s.count))
                .unwrap_or(0),
            enforcements_count: enforcements.map(|e| e.count()).unwrap_or(0),
            enforcements_sum: enforcements.and_then(|e| e.total_sum).unwrap_or(0.0),
            inspections_count: inspections.map(|i| i.count()).unwrap_or(0),
            inspections_with_violations: inspections.map(|i| i.with_violations()).unwrap_or(0),
        }
    }

    /// Active unless the status mentions liquidation or bankruptcy.
    ///
    /// A missing status counts as active.
    pub fn is_active(&self) -> bool {
        match &self.company_status {
            Some(status) => {
                let status = status.to_lowercase();
                !INACTIVE_STATUS_MARKERS.iter().any(|m| status.contains(m))
            }
            None => true,
        }
    }

    /// Company age in whole years at `as_of`.
    pub fn age_years(&self, as_of: NaiveDate) -> Option<i32> {
        let registered = self.registration_date?;
        let mut years = as_of.year() - registered.year();
        if (as_of.month(), as_of.day()) < (registered.month(), registered.day()) {
            years -= 1;
        }
        (years >= 0).then_some(years)
    }

    /// Revenue strictly grew over the two most recent year-over-year steps.
    ///
    /// Looks at the latest three reported years (two when only two exist).
    /// Every step must join consecutive years with known revenue and show a
    /// strict increase; fewer than two years never counts as growth.
    pub fn revenue_growing(&self) -> bool {
        let recent: Vec<&(i32, Option<f64>)> = self.revenue_by_year.iter().rev().take(3).collect();
        if recent.len() < 2 {
            return false;
        }
        recent.windows(2).all(|pair| {
            let (newer_year, newer) = *pair[0];
            let (older_year, older) = *pair[1];
            match (newer, older) {
                (Some(newer), Some(older)) => newer_year == older_year + 1 && newer > older,
                _ => false,
            }
        })
    }
}

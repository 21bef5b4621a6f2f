//! Supplier risk assessment.
//!
//! Two independent strategies share one input type, [`CompanyFacts`]:
//! - [`ReliabilityScorer`]: additive 0-100 reliability score with reasons
//! - [`VerdictHeuristic`]: low/medium/high verdict for the supplier card
//!
//! Their thresholds differ and they are allowed to disagree.

mod facts;
mod reliability;
mod verdict;

use chrono::NaiveDate;

use crate::checko::CheckoSnapshot;
use crate::models::SupplierRecord;

pub use facts::CompanyFacts;
pub use reliability::{ReliabilityLevel, ReliabilityScore, ReliabilityScorer};
pub use verdict::{RiskLevel, RiskVerdict, VerdictHeuristic};

/// A named risk strategy over resolved company facts.
pub trait RiskAssessment {
    /// Strategy output.
    type Report;

    /// Stable strategy name, used in logs.
    fn name(&self) -> &'static str;

    /// Evaluates the facts. Must be pure.
    fn assess(&self, facts: &CompanyFacts) -> Self::Report;
}

/// Scores a company from its registry snapshot and/or supplier record.
///
/// Without `snapshot`, the record's serialized `checko_data` is used.
pub fn calculate_reliability_score(
    snapshot: Option<&CheckoSnapshot>,
    record: Option<&SupplierRecord>,
    as_of: NaiveDate,
) -> ReliabilityScore {
    let facts = CompanyFacts::resolve(snapshot, record);
    ReliabilityScorer::new(as_of).assess(&facts)
}

/// Like [`calculate_reliability_score`], but returns the snapshot's
/// upstream `rating` unchanged when one is present.
pub fn calculate_reliability_rating(
    snapshot: Option<&CheckoSnapshot>,
    record: Option<&SupplierRecord>,
    as_of: NaiveDate,
) -> ReliabilityScore {
    if let Some(rating) = snapshot.and_then(|s| s.rating.as_ref()) {
        log::debug!("Using upstream rating {} ({})", rating.score, rating.level);
        return rating.clone();
    }
    calculate_reliability_score(snapshot, record, as_of)
}

/// Verdict for a company from its registry snapshot and/or supplier record.
pub fn assess_verdict(
    snapshot: Option<&CheckoSnapshot>,
    record: Option<&SupplierRecord>,
) -> RiskVerdict {
    VerdictHeuristic.assess(&CompanyFacts::resolve(snapshot, record))
}

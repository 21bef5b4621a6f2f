//! 0-100 supplier reliability score.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::facts::CompanyFacts;
use super::RiskAssessment;
use crate::config::{
    MAX_REASONS, RELIABILITY_BASE_SCORE, RELIABILITY_CASE_COUNT_LIMIT, RELIABILITY_CLAIM_SUM_LIMIT,
    RELIABILITY_ENFORCEMENT_SUM_LIMIT, RELIABILITY_HIGH_THRESHOLD, RELIABILITY_INACTIVE_CAP,
    RELIABILITY_MEDIUM_THRESHOLD, RELIABILITY_MIN_AGE_YEARS,
};
use crate::utils::format_compact_currency;

/// Reliability band derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReliabilityLevel {
    /// Score >= 75
    High,
    /// Score >= 50
    Medium,
    /// Score < 50
    Low,
}

impl ReliabilityLevel {
    /// Band of a final score.
    pub fn from_score(score: u8) -> Self {
        let score = i32::from(score);
        if score >= RELIABILITY_HIGH_THRESHOLD {
            ReliabilityLevel::High
        } else if score >= RELIABILITY_MEDIUM_THRESHOLD {
            ReliabilityLevel::Medium
        } else {
            ReliabilityLevel::Low
        }
    }
}

/// Output of [`ReliabilityScorer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReliabilityScore {
    pub level: ReliabilityLevel,
    /// Always within `0..=100`
    pub score: u8,
    /// First five triggered reasons, in rule order
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub positive: Vec<String>,
    #[serde(default)]
    pub attention: Vec<String>,
    #[serde(default)]
    pub negative: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polarity {
    Positive,
    Attention,
    Negative,
}

/// Accumulates score adjustments and their reasons.
struct Tally {
    score: i32,
    reasons: Vec<(Polarity, String)>,
}

impl Tally {
    fn adjust(&mut self, delta: i32, polarity: Polarity, reason: String) {
        self.score += delta;
        self.reasons.push((polarity, reason));
    }

    fn bucket(&self, polarity: Polarity) -> Vec<String> {
        self.reasons
            .iter()
            .filter(|(p, _)| *p == polarity)
            .map(|(_, r)| r.clone())
            .collect()
    }
}

/// Additive reliability rules on a base of 70 points.
///
/// | Rule | Points |
/// |------|--------|
/// | active and older than 3 full years | +10 |
/// | revenue grew over the last two steps | +5 |
/// | no enforcement proceedings | +5 |
/// | inspections on record, none with violations | +5 |
/// | enforcement proceedings | -20 |
/// | enforcement sum above 5 mln | -10 |
/// | legal claim sum above 100 mln | -10 |
/// | more than 50 cases with at least one as defendant | -10 |
/// | inspections with violations (attention) | -5 |
/// | liquidation or bankruptcy | capped at 30 |
///
/// The result is clamped to `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReliabilityScorer {
    /// Date company age is measured at
    pub as_of: NaiveDate,
}

impl ReliabilityScorer {
    /// Scorer measuring company age at `as_of`.
    pub fn new(as_of: NaiveDate) -> Self {
        Self { as_of }
    }

    /// Scores resolved facts.
    pub fn score(&self, facts: &CompanyFacts) -> ReliabilityScore {
        let mut tally = Tally {
            score: RELIABILITY_BASE_SCORE,
            reasons: Vec::new(),
        };
        let active = facts.is_active();

        let age = facts.age_years(self.as_of);
        if let (Some(age), Some(registered)) = (age, facts.registration_date) {
            if active && age > RELIABILITY_MIN_AGE_YEARS {
                tally.adjust(
                    10,
                    Polarity::Positive,
                    format!(
                        "Действующая компания старше {} лет (с {} г.)",
                        RELIABILITY_MIN_AGE_YEARS,
                        registered.year()
                    ),
                );
            }
        }

        if facts.revenue_growing() {
            tally.adjust(5, Polarity::Positive, "Рост выручки за последние годы".to_string());
        }

        match facts.enforcements_count {
            0 => tally.adjust(
                5,
                Polarity::Positive,
                "Нет исполнительных производств".to_string(),
            ),
            count => tally.adjust(
                -20,
                Polarity::Negative,
                format!("Исполнительные производства: {count}"),
            ),
        }

        if facts.inspections_count > 0 && facts.inspections_with_violations == 0 {
            tally.adjust(
                5,
                Polarity::Positive,
                format!("Проверки без нарушений ({})", facts.inspections_count),
            );
        }

        if facts.enforcements_sum > RELIABILITY_ENFORCEMENT_SUM_LIMIT {
            tally.adjust(
                -10,
                Polarity::Negative,
                format!(
                    "Сумма исполнительных производств: {}",
                    format_compact_currency(facts.enforcements_sum)
                ),
            );
        }

        if facts.legal_cases_sum > RELIABILITY_CLAIM_SUM_LIMIT {
            tally.adjust(
                -10,
                Polarity::Negative,
                format!(
                    "Сумма судебных исков: {}",
                    format_compact_currency(facts.legal_cases_sum)
                ),
            );
        }

        if facts.legal_cases_count > RELIABILITY_CASE_COUNT_LIMIT
            && facts.legal_cases_as_defendant > 0
        {
            tally.adjust(
                -10,
                Polarity::Negative,
                format!(
                    "Много судебных дел: {}, из них в качестве ответчика: {}",
                    facts.legal_cases_count, facts.legal_cases_as_defendant
                ),
            );
        }

        if facts.inspections_with_violations > 0 {
            tally.adjust(
                -5,
                Polarity::Attention,
                format!(
                    "Проверки с нарушениями: {}",
                    facts.inspections_with_violations
                ),
            );
        }

        if !active {
            tally.score = tally.score.min(RELIABILITY_INACTIVE_CAP);
            tally.reasons.push((
                Polarity::Negative,
                format!(
                    "Компания не действует: {}",
                    facts.company_status.as_deref().unwrap_or_default()
                ),
            ));
        }

        // Clamped to 0..=100, so the cast cannot truncate
        let score = tally.score.clamp(0, 100) as u8;
        ReliabilityScore {
            level: ReliabilityLevel::from_score(score),
            score,
            reasons: tally
                .reasons
                .iter()
                .take(MAX_REASONS)
                .map(|(_, r)| r.clone())
                .collect(),
            positive: tally.bucket(Polarity::Positive),
            attention: tally.bucket(Polarity::Attention),
            negative: tally.bucket(Polarity::Negative),
        }
    }
}

impl RiskAssessment for ReliabilityScorer {
    type Report = ReliabilityScore;

    fn name(&self) -> &'static str {
        "reliability-score"
    }

    fn assess(&self, facts: &CompanyFacts) -> ReliabilityScore {
        self.score(facts)
    }
}

//! Supplier card risk verdict.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::facts::CompanyFacts;
use super::RiskAssessment;
use crate::config::{VERDICT_CLAIM_SUM_LIMIT, VERDICT_INSPECTIONS_LIMIT};
use crate::utils::format_compact_currency;

/// Verdict level shown on the supplier card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Fixed moderator recommendation for the level.
    pub fn recommendation(self) -> &'static str {
        match self {
            RiskLevel::High => "рассмотреть добавление в blacklist",
            RiskLevel::Medium => "усиленный мониторинг",
            RiskLevel::Low => "стандартный мониторинг",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub level: RiskLevel,
    pub explanation: String,
    pub recommendation: String,
}

/// Threshold heuristic behind the supplier card verdict.
///
/// Runs independently of [`ReliabilityScorer`](super::ReliabilityScorer)
/// and may disagree with it: total case count plays no part here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerdictHeuristic;

impl VerdictHeuristic {
    pub fn verdict(&self, facts: &CompanyFacts) -> RiskVerdict {
        let enforcements = facts.enforcements_count;

        let mut high = Vec::new();
        if enforcements > 0 {
            high.push(format!("исполнительные производства ({enforcements})"));
        }
        if facts.legal_cases_sum > VERDICT_CLAIM_SUM_LIMIT {
            high.push(format!(
                "сумма исков {}",
                format_compact_currency(facts.legal_cases_sum)
            ));
        }

        let mut medium = Vec::new();
        if facts.inspections_count > VERDICT_INSPECTIONS_LIMIT {
            medium.push(format!("проверок: {}", facts.inspections_count));
        }
        if facts.legal_cases_as_plaintiff > 0 {
            medium.push(format!("дела в качестве истца: {}", facts.legal_cases_as_plaintiff));
        }
        if facts.legal_cases_as_defendant > 0 {
            medium.push(format!(
                "дела в качестве ответчика: {}",
                facts.legal_cases_as_defendant
            ));
        }

        let (level, explanation) = if !high.is_empty() {
            (RiskLevel::High, format!("Высокий риск: {}", high.join("; ")))
        } else if !medium.is_empty() {
            (RiskLevel::Medium, format!("Средний риск: {}", medium.join("; ")))
        } else {
            (RiskLevel::Low, "Существенных рисков не выявлено".to_string())
        };

        RiskVerdict {
            level,
            explanation,
            recommendation: level.recommendation().to_string(),
        }
    }
}

impl RiskAssessment for VerdictHeuristic {
    type Report = RiskVerdict;

    fn name(&self) -> &'static str {
        "verdict"
    }

    fn assess(&self, facts: &CompanyFacts) -> RiskVerdict {
        self.verdict(facts)
    }
}

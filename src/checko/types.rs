//! Typed view of the Checko company-registry payloads.
//!
//! Checko answers with Cyrillic keys. They are mapped here, and only here:
//!
//! | Key                      | Field                                  |
//! |--------------------------|----------------------------------------|
//! | `ОГРН`, `ИНН`, `КПП`, `ОКПО` | registration identifiers           |
//! | `НаимСокр`, `НаимПолн`   | short and full company name            |
//! | `ДатаРег`                | registration date (`YYYY-MM-DD`)       |
//! | `Статус.Наим`            | status text (`Действует`, `В процессе ликвидации`, ...) |
//! | `ЮрАдрес.АдресРФ`        | legal address                          |
//! | `УстКап.Сумма`           | authorized capital                     |
//! | `Контакты.Тел/Емэйл/ВебСайт/ВК/Телеграм` | contacts               |
//! | finances `{year: {"2110": .., "2400": ..}}` | revenue, net profit |
//! | `ОбщКолич`               | total count (cases, inspections, enforcements) |
//! | `ОбщСуммИск`             | total claim sum of legal cases         |
//! | `Истец` / `Ответчик`     | cases as plaintiff / as defendant (`Колич`, `Сумма`) |
//! | `Записи[].Нарушения`     | inspection found violations            |
//! | `ОбщСумма`               | total enforcement amount               |
//!
//! Every field is optional and unknown keys are ignored. Numbers are accepted
//! either as JSON numbers or as numeric strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::risk::ReliabilityScore;

/// Reads a JSON number or a numeric string (`"1 200,50"` included).
pub(crate) fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .replace([' ', '\u{a0}'], "")
            .replace(',', ".")
            .parse()
            .ok(),
        _ => None,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .filter(|n| *n >= 0.0)
        .map(|n| n.round() as u64))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A string or a list of strings; both shapes occur in `Контакты`.
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s],
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Company status; `{"Код": .., "Наим": ..}` in current payloads, plain text in old ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyStatus {
    #[serde(
        rename = "Код",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub code: Option<String>,
    #[serde(
        rename = "Наим",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
}

fn company_status<'de, D>(deserializer: D) -> Result<Option<CompanyStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(CompanyStatus {
            code: None,
            name: Some(s),
        }),
        Some(obj @ Value::Object(_)) => serde_json::from_value(obj).ok(),
        _ => None,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(
        rename = "АдресРФ",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub full: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Capital {
    #[serde(
        rename = "Сумма",
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contacts {
    #[serde(
        rename = "Тел",
        default,
        deserialize_with = "string_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub phones: Vec<String>,
    #[serde(
        rename = "Емэйл",
        default,
        deserialize_with = "string_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub emails: Vec<String>,
    #[serde(
        rename = "ВебСайт",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub website: Option<String>,
    #[serde(
        rename = "ВК",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub vk: Option<String>,
    #[serde(
        rename = "Телеграм",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub telegram: Option<String>,
}

/// `company` resource: registration card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(
        rename = "ОГРН",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub ogrn: Option<String>,
    #[serde(
        rename = "ИНН",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub inn: Option<String>,
    #[serde(
        rename = "КПП",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub kpp: Option<String>,
    #[serde(
        rename = "ОКПО",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub okpo: Option<String>,
    #[serde(
        rename = "НаимСокр",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub short_name: Option<String>,
    #[serde(
        rename = "НаимПолн",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub full_name: Option<String>,
    #[serde(
        rename = "ДатаРег",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub registration_date: Option<String>,
    #[serde(
        rename = "Статус",
        default,
        deserialize_with = "company_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<CompanyStatus>,
    #[serde(rename = "ЮрАдрес", default, skip_serializing_if = "Option::is_none")]
    pub legal_address: Option<Address>,
    #[serde(rename = "УстКап", default, skip_serializing_if = "Option::is_none")]
    pub authorized_capital: Option<Capital>,
    #[serde(rename = "Контакты", default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Contacts>,
}

impl CompanyInfo {
    /// Status text, if any.
    pub fn status_name(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.name.as_deref())
    }

    /// Short name, falling back to the full name.
    pub fn display_name(&self) -> Option<&str> {
        self.short_name.as_deref().or(self.full_name.as_deref())
    }

    /// True when the payload identifies a company at all.
    pub fn is_identified(&self) -> bool {
        self.inn.is_some() || self.ogrn.is_some()
    }
}

/// Reporting lines of one financial year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceYear {
    /// Line 2110
    #[serde(
        rename = "2110",
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub revenue: Option<f64>,
    /// Line 2400
    #[serde(
        rename = "2400",
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub net_profit: Option<f64>,
}

/// `finances` resource: reporting lines keyed by year.
///
/// Keys that are not years and values that are not objects are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Value>",
    into = "BTreeMap<String, FinanceYear>"
)]
pub struct Finances {
    years: BTreeMap<i32, FinanceYear>,
}

impl From<BTreeMap<String, Value>> for Finances {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let years = raw
            .into_iter()
            .filter_map(|(key, value)| {
                let year = key.trim().parse::<i32>().ok()?;
                if !value.is_object() {
                    return None;
                }
                let lines = serde_json::from_value::<FinanceYear>(value).ok()?;
                Some((year, lines))
            })
            .collect();
        Finances { years }
    }
}

impl From<Finances> for BTreeMap<String, FinanceYear> {
    fn from(finances: Finances) -> Self {
        finances
            .years
            .into_iter()
            .map(|(year, lines)| (year.to_string(), lines))
            .collect()
    }
}

impl Finances {
    /// Builds finances from `(year, revenue, net_profit)` rows.
    pub fn from_rows(rows: impl IntoIterator<Item = (i32, Option<f64>, Option<f64>)>) -> Self {
        let years = rows
            .into_iter()
            .map(|(year, revenue, net_profit)| (year, FinanceYear { revenue, net_profit }))
            .collect();
        Finances { years }
    }

    /// True when no year is reported.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Years in ascending order.
    pub fn years(&self) -> impl DoubleEndedIterator<Item = (i32, &FinanceYear)> {
        self.years.iter().map(|(y, f)| (*y, f))
    }

    /// The most recent reported year.
    pub fn latest(&self) -> Option<(i32, &FinanceYear)> {
        self.years().next_back()
    }
}

/// Case counter for one side of the legal-case statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegalSide {
    #[serde(
        rename = "Колич",
        default,
        deserialize_with = "lenient_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub count: Option<u64>,
    #[serde(
        rename = "Сумма",
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub sum: Option<f64>,
}

/// `legal-cases` resource: arbitration statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegalCases {
    #[serde(
        rename = "ОбщКолич",
        default,
        deserialize_with = "lenient_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_count: Option<u64>,
    #[serde(
        rename = "ОбщСуммИск",
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_claim_sum: Option<f64>,
    #[serde(rename = "Истец", default, skip_serializing_if = "Option::is_none")]
    pub as_plaintiff: Option<LegalSide>,
    #[serde(rename = "Ответчик", default, skip_serializing_if = "Option::is_none")]
    pub as_defendant: Option<LegalSide>,
}

/// One state inspection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    #[serde(
        rename = "Дата",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
    #[serde(
        rename = "Тип",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(rename = "Нарушения", default, skip_serializing_if = "Option::is_none")]
    pub violations: Option<bool>,
}

/// `inspections` resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inspections {
    #[serde(
        rename = "ОбщКолич",
        default,
        deserialize_with = "lenient_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_count: Option<u64>,
    #[serde(rename = "Записи", default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<Inspection>,
}

impl Inspections {
    /// Number of inspections; the explicit total wins over the record count.
    pub fn count(&self) -> u64 {
        self.total_count.unwrap_or(self.records.len() as u64)
    }

    /// Number of inspections that found violations.
    pub fn with_violations(&self) -> u64 {
        self.records
            .iter()
            .filter(|r| r.violations == Some(true))
            .count() as u64
    }
}

/// `enforcements` resource: enforcement proceedings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enforcements {
    #[serde(
        rename = "ОбщКолич",
        default,
        deserialize_with = "lenient_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_count: Option<u64>,
    #[serde(
        rename = "ОбщСумма",
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_sum: Option<f64>,
    #[serde(rename = "Записи", default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<Value>,
}

impl Enforcements {
    /// Number of proceedings; the explicit total wins over the record count.
    pub fn count(&self) -> u64 {
        self.total_count.unwrap_or(self.records.len() as u64)
    }
}

/// Point-in-time registry snapshot of one company.
///
/// This is what gets serialized into `SupplierRecord::checko_data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyInfo>,
    #[serde(skip_serializing_if = "Finances::is_empty")]
    pub finances: Finances,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_cases: Option<LegalCases>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspections: Option<Inspections>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforcements: Option<Enforcements>,
    /// Rating computed upstream, preferred by the legacy rating entry point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<ReliabilityScore>,
    /// When the snapshot was taken (RFC 3339)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<String>,
}

impl CheckoSnapshot {
    /// Parses a serialized snapshot.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parses a serialized snapshot, treating a malformed blob as absent.
    pub fn parse_lenient(json: &str) -> Option<Self> {
        match Self::parse(json) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::debug!("Ignoring malformed registry snapshot: {e}");
                None
            }
        }
    }

    /// Serializes the snapshot for storage in `checko_data`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Checko response envelope: `{"data": .., "meta": {"status": .., "message": ..}}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub(crate) data: Option<Value>,
    #[serde(default)]
    pub(crate) meta: Option<EnvelopeMeta>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EnvelopeMeta {
    #[serde(default)]
    pub(crate) status: Option<String>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

//! Registry lookup and risk report for one company.

use anyhow::{Context, Result};
use chrono::Local;
use serde_json::json;

use super::context::AppContext;
use crate::checko::CheckoSnapshot;
use crate::models::SupplierRecord;
use crate::risk::{
    assess_verdict, calculate_reliability_rating, ReliabilityScore, RiskVerdict,
};
use crate::utils::{format_compact_currency, format_currency, format_date};

pub async fn score(ctx: &AppContext, inn: &str, json: bool) -> Result<()> {
    let checko = ctx.checko()?;
    let snapshot = checko
        .fetch_snapshot(inn)
        .await
        .with_context(|| format!("Registry lookup failed for INN {inn}"))?;

    let today = Local::now().date_naive();
    let rating = calculate_reliability_rating(Some(&snapshot), None, today);
    let verdict = assess_verdict(Some(&snapshot), None);

    if json {
        let report = json!({
            "snapshot": snapshot,
            "reliability": rating,
            "verdict": verdict,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&snapshot, &rating, &verdict));
    }
    Ok(())
}

/// Risk report for a stored supplier, from its record and saved snapshot.
///
/// Makes no registry calls; a supplier never enriched is scored from its
/// record alone.
pub async fn supplier(ctx: &AppContext, id: i64, json: bool) -> Result<()> {
    let record = ctx
        .api
        .get_supplier(id)
        .await
        .with_context(|| format!("Failed to load supplier #{id}"))?;
    let snapshot = record
        .checko_data
        .as_deref()
        .and_then(CheckoSnapshot::parse_lenient);

    let today = Local::now().date_naive();
    let rating = calculate_reliability_rating(snapshot.as_ref(), Some(&record), today);
    let verdict = assess_verdict(snapshot.as_ref(), Some(&record));

    if json {
        let report = json!({
            "supplier": SupplierRecord { checko_data: None, ..record },
            "snapshot": snapshot,
            "reliability": rating,
            "verdict": verdict,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", supplier_header(&record));
        print!(
            "{}",
            render_report(&snapshot.unwrap_or_default(), &rating, &verdict)
        );
    }
    Ok(())
}

fn supplier_header(record: &SupplierRecord) -> String {
    format!(
        "#{} {} ({}) ИНН {} {}",
        record.id,
        record.name,
        record.supplier_type,
        record.inn.as_deref().unwrap_or("-"),
        record.domain.as_deref().unwrap_or("-")
    )
}

fn render_report(
    snapshot: &CheckoSnapshot,
    rating: &ReliabilityScore,
    verdict: &RiskVerdict,
) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: String| {
        out.push_str(&format!("{label:<18} {value}\n"));
    };

    if let Some(company) = &snapshot.company {
        line("Компания", company.display_name().unwrap_or("-").to_string());
        line("ИНН", company.inn.clone().unwrap_or_default());
        line("ОГРН", company.ogrn.clone().unwrap_or_default());
        line("Статус", company.status_name().unwrap_or("-").to_string());
        line(
            "Регистрация",
            company
                .registration_date
                .as_deref()
                .map(format_date)
                .unwrap_or_default(),
        );
    }
    if let Some((year, lines)) = snapshot.finances.latest() {
        if let Some(revenue) = lines.revenue {
            line(&format!("Выручка {year}"), format_currency(revenue));
        }
    }
    if let Some(cases) = &snapshot.legal_cases {
        line(
            "Судебные дела",
            format!(
                "{} на {}",
                cases.total_count.unwrap_or(0),
                format_compact_currency(cases.total_claim_sum.unwrap_or(0.0))
            ),
        );
    }

    line("Надежность", format!("{} ({})", rating.score, rating.level));
    for reason in &rating.reasons {
        line("", format!("- {reason}"));
    }
    line("Риск", verdict.explanation.clone());
    line("Рекомендация", verdict.recommendation.clone());
    out
}

//! Currency and date formatting for moderator-facing output.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parses the date formats the backend and the registry use.
///
/// Accepts `YYYY-MM-DD`, RFC 3339, naive ISO date-times and `DD.MM.YYYY`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(value, "%d.%m.%Y").ok()
}

/// Formats a date as `DD.MM.YYYY`; unparseable input is returned unchanged.
pub fn format_date(value: &str) -> String {
    match parse_date(value) {
        Some(date) => date.format("%d.%m.%Y").to_string(),
        None => value.to_string(),
    }
}

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if n < 1000 {
            groups.push(n.to_string());
            break;
        }
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.reverse();
    groups.join(" ")
}

/// Formats an amount in whole rubles: `1 234 567 ₽`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "— ₽".to_string();
    }
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{} ₽", sign, group_thousands(rounded.abs() as u64))
}

/// Formats a large amount with a Russian scale suffix: `1,2 млн ₽`.
pub fn format_compact_currency(amount: f64) -> String {
    const SCALES: [(f64, &str); 3] = [(1e9, "млрд"), (1e6, "млн"), (1e3, "тыс.")];
    if !amount.is_finite() {
        return format_currency(amount);
    }
    for (scale, suffix) in SCALES {
        if amount.abs() >= scale {
            let scaled = format!("{:.1}", amount / scale);
            let scaled = scaled.strip_suffix(".0").unwrap_or(&scaled).replace('.', ",");
            return format!("{} {} ₽", scaled, suffix);
        }
    }
    format_currency(amount)
}

//! Presentation helpers: en-IN dates, INR amounts and plain-text tables.

use crate::common::types::{value_text, ClashEntry, FieldName, TenderRecord};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Indian Standard Time, UTC+05:30
fn ist() -> Option<FixedOffset> {
    FixedOffset::east_opt(5 * 3600 + 30 * 60)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(match ist() {
            Some(offset) => dt.with_timezone(&offset).date_naive(),
            None => dt.date_naive(),
        });
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// `D/M/YYYY` as the en-IN locale writes dates; unparseable input is returned as-is
pub fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format("%-d/%-m/%Y").to_string(),
        None => raw.to_string(),
    }
}

/// Rupees with Indian digit grouping, e.g. `₹12,34,567.50`
pub fn format_inr(amount: f64) -> String {
    let paise = (amount.abs() * 100.0).round() as u128;
    let rupees = (paise / 100).to_string();
    let fraction = paise % 100;

    let grouped = if rupees.len() <= 3 {
        rupees
    } else {
        let (head, tail) = rupees.split_at(rupees.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 2 {
            groups.push(&head[end - 2..end]);
            end -= 2;
        }
        groups.push(&head[..end]);
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    let sign = if amount < 0.0 && paise > 0 { "-" } else { "" };
    format!("{}₹{}.{:02}", sign, grouped, fraction)
}

fn amount_cell(value: &Value) -> Option<String> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    match amount {
        Some(a) => Some(format_inr(a)),
        None => value_text(value),
    }
}

/// A record field as shown in a table cell
pub fn cell(record: &TenderRecord, field: FieldName) -> String {
    let Some(value) = record.get(field) else {
        return String::new();
    };
    if field == FieldName::SanctionAmount {
        return amount_cell(value).unwrap_or_default();
    }
    match value_text(value) {
        Some(text) if field.is_date() => format_date(&text),
        Some(text) => text,
        None => String::new(),
    }
}

pub fn clash_cells(entry: &ClashEntry) -> Vec<String> {
    vec![
        value_text(&entry.id).unwrap_or_default(),
        value_text(&entry.postal_code).unwrap_or_default(),
        date_cell(&entry.sanction_date),
        date_cell(&entry.completion_date),
        entry.priority().to_string(),
    ]
}

fn date_cell(value: &Value) -> String {
    match value {
        Value::String(raw) => format_date(raw),
        other => value_text(other).unwrap_or_default(),
    }
}

/// Left-aligned columns separated by two spaces, header underlined
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, value) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(value.chars().count());
            }
        }
    }

    let line = |values: &[String]| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers)];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.extend(rows.iter().map(|row| line(row)));
    out.join("\n")
}

pub fn render_records(columns: &[FieldName], records: &[TenderRecord]) -> String {
    let headers: Vec<String> = columns.iter().map(|c| c.label()).collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| columns.iter().map(|c| cell(r, *c)).collect())
        .collect();
    render_table(&headers, &rows)
}

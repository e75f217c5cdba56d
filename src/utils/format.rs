//! Display-string conversions for form values
//!
//! Form fields hold what the user typed (`"R$ 1.200,50"`, `"15/03/2025"`);
//! records hold numbers and dates. These helpers convert in both directions.

use chrono::NaiveDate;

/// Parse a pt-BR money string into a number
///
/// Currency symbols, spaces and thousands separators (`.`) are dropped, the
/// decimal comma becomes a point. Anything that still fails to parse yields 0.
pub fn parse_money(text: &str) -> f64 {
    parse_number(text, false).unwrap_or(0.0)
}

/// Parse a quantity such as consumption, `None` when nothing numeric is left
///
/// pt-BR layout (`"1.234,5"`) is the norm. Without a comma, a single `.` is
/// taken as the decimal point, so `"12.5"` is 12.5 and not 125.
pub fn parse_decimal(text: &str) -> Option<f64> {
    parse_number(text, true)
}

fn parse_number(text: &str, lone_dot_is_decimal: bool) -> Option<f64> {
    let dot_is_decimal =
        lone_dot_is_decimal && !text.contains(',') && text.matches('.').count() == 1;

    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '-' || (dot_is_decimal && *c == '.'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a non-negative integer field, ignoring surrounding text
pub fn parse_count(text: &str) -> Option<u32> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Parse a date typed as `YYYY-MM-DD` or `DD/MM/YYYY`
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%d/%m/%Y"))
        .ok()
}

/// Date as shown in the form
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Format a number as pt-BR currency: `R$ 1.200,50`
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let integer = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, fraction)
}

/// Format a plain decimal with comma separator
///
/// Rounded to three places, trailing zeros dropped.
pub fn format_decimal(value: Option<f64>) -> String {
    let Some(v) = value else {
        return String::new();
    };
    let fixed = format!("{:.3}", v);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => "0".to_string(),
        other => other.replace('.', ","),
    }
}

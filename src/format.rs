//! Display formatting for values printed in the report.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use mongodb::bson::Bson;

use crate::record::bson_text;

/// Placeholder printed for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Pattern every recognised date is rendered with.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Returns the text or [`NOT_AVAILABLE`] when absent.
pub fn text_or_placeholder(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_owned()
}

/// Formats an amount as `$1,234,567.89`.
pub fn format_currency(amount: f64) -> String {
    format!("${}", group_thousands(&format!("{amount:.2}")))
}

fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(number.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Parses the ISO-8601 shapes found in stored records.
///
/// Zoned timestamps keep the wall-clock time of their own offset.
pub fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(zoned) = DateTime::parse_from_rfc3339(value) {
        return Some(zoned.naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Formats a stored date for display. Never fails.
///
/// Absent, null and blank values yield [`NOT_AVAILABLE`]; strings that are not
/// ISO-8601 are returned unchanged.
pub fn format_date(value: Option<&Bson>) -> String {
    match value {
        None | Some(Bson::Null) | Some(Bson::Undefined) => NOT_AVAILABLE.to_owned(),
        Some(Bson::String(text)) if text.trim().is_empty() => NOT_AVAILABLE.to_owned(),
        Some(Bson::String(text)) => parse_iso_datetime(text)
            .map(|parsed| parsed.format(DATE_TIME_FORMAT).to_string())
            .unwrap_or_else(|| text.clone()),
        Some(Bson::DateTime(stored)) => {
            DateTime::<Utc>::from_timestamp_millis(stored.timestamp_millis())
                .map(|utc| utc.format(DATE_TIME_FORMAT).to_string())
                .unwrap_or_else(|| stored.to_string())
        }
        Some(other) => bson_text(other.clone()).unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
    }
}

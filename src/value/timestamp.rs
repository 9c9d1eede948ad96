// Date range bound parsing
use super::{json_kind, ValueError};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Years representable in the four-digit `yyyy` of the Solr date format
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

/// Parse one date range bound.
///
/// Accepts `null` (open bound), RFC 3339 strings, `yyyy-MM-ddTHH:mm:ss` and
/// `yyyy-MM-dd` strings read as UTC, and integers of epoch milliseconds.
/// Bounds outside years 0000-9999 are rejected.
pub fn parse_bound(
    bound: &'static str,
    value: &Value,
) -> Result<Option<DateTime<Utc>>, ValueError> {
    let parsed = parse_value(bound, value)?;
    match parsed {
        Some(t) if !YEAR_RANGE.contains(&t.year()) => Err(ValueError::InvalidTimestamp {
            bound,
            input: value.to_string(),
        }),
        _ => Ok(parsed),
    }
}

fn parse_value(
    bound: &'static str,
    value: &Value,
) -> Result<Option<DateTime<Utc>>, ValueError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => parse_text(s.trim())
            .map(Some)
            .ok_or_else(|| ValueError::InvalidTimestamp {
                bound,
                input: s.clone(),
            }),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(Some)
            .ok_or_else(|| ValueError::InvalidTimestamp {
                bound,
                input: n.to_string(),
            }),
        other => Err(ValueError::UnsupportedBound {
            bound,
            kind: json_kind(other),
        }),
    }
}

fn parse_text(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

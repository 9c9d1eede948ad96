//! Field clause rendering
//!
//! Turns one `(field, TypedValue)` pair into a Solr query fragment. Rendering is
//! pure; a value that selects nothing (empty list, unbounded range) renders to
//! `None` so that it never contributes a stray conjunction.

use crate::value::{Scalar, TypedValue};
use chrono::{DateTime, Utc};

/// Date format applied to every range bound
pub const SOLR_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Separator placed between two non-empty clauses
pub const CLAUSE_SEPARATOR: &str = " AND ";

/// Render a single field clause
pub fn render(field: &str, value: &TypedValue) -> Option<String> {
    match value {
        TypedValue::Scalar(scalar) => Some(format!("{}:{}", field, scalar)),
        TypedValue::List(items) => render_list(field, items),
        TypedValue::Presence { negate } => Some(format!(
            "{}{}:[\"\" TO *]",
            if *negate { "-" } else { "" },
            field
        )),
        TypedValue::DateRange { begin, end } => render_range(field, begin.as_ref(), end.as_ref()),
    }
}

fn render_list(field: &str, items: &[Scalar]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let values: Vec<String> = items.iter().map(ToString::to_string).collect();
    Some(format!("{}:({})", field, values.join(" OR ")))
}

fn render_range(
    field: &str,
    begin: Option<&DateTime<Utc>>,
    end: Option<&DateTime<Utc>>,
) -> Option<String> {
    if begin.is_none() && end.is_none() {
        return None;
    }
    Some(format!(
        "{}:[{} TO {}]",
        field,
        format_bound(begin),
        format_bound(end)
    ))
}

fn format_bound(bound: Option<&DateTime<Utc>>) -> String {
    bound
        .map(|t| t.format(SOLR_DATE_FORMAT).to_string())
        .unwrap_or_else(|| "*".to_string())
}

/// Join clauses with `" AND "`, ignoring empty fragments
pub fn join_clauses<I, S>(clauses: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for clause in clauses {
        let clause = clause.as_ref().trim();
        if clause.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push_str(CLAUSE_SEPARATOR);
        }
        joined.push_str(clause);
    }
    joined
}

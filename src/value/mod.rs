//! Typed value model
//!
//! Request parameters arrive as loosely-typed JSON. Each value is classified by
//! its shape into one of the [`TypedValue`] variants before rendering:
//!
//! - string, number, bool → [`TypedValue::Scalar`]
//! - array → [`TypedValue::List`]
//! - `{"exists": bool}` → [`TypedValue::Presence`]
//! - `{"begin": .., "end": ..}` → [`TypedValue::DateRange`]
//! - `null` → no value at all
//!
//! Shapes that match none of these are kept as text scalars rather than rejected.

mod params;
mod timestamp;

pub use params::ParameterSet;
pub use timestamp::parse_bound;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

const EXISTS_KEY: &str = "exists";
const BEGIN_KEY: &str = "begin";
const END_KEY: &str = "end";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("unsupported {bound} bound of type {kind}")]
    UnsupportedBound {
        bound: &'static str,
        kind: &'static str,
    },

    #[error("cannot parse {bound} bound {input:?} as a timestamp")]
    InvalidTimestamp { bound: &'static str, input: String },
}

/// A single filter value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Integer(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" on whole numbers
            Scalar::Float(x) => write!(f, "{:?}", x),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Classified shape of a parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Exact match on one value
    Scalar(Scalar),
    /// Match any of the listed values
    List(Vec<Scalar>),
    /// Field has any value (`negate == false`) or has none (`negate == true`)
    Presence { negate: bool },
    /// Inclusive date range; an absent bound is open
    DateRange {
        begin: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
}

impl TypedValue {
    /// Classify an opaque JSON value by its structure.
    ///
    /// Returns `Ok(None)` for `null`. Only date range bounds can fail.
    pub fn classify(value: &Value) -> Result<Option<TypedValue>, ValueError> {
        let typed = match value {
            Value::Null => return Ok(None),
            Value::Array(items) => TypedValue::List(items.iter().filter_map(to_scalar).collect()),
            Value::Object(map) => classify_object(map)?,
            other => match to_scalar(other) {
                Some(scalar) => TypedValue::Scalar(scalar),
                None => return Ok(None),
            },
        };
        Ok(Some(typed))
    }

    /// Presence filter matching documents that have the field
    pub fn present() -> Self {
        TypedValue::Presence { negate: false }
    }

    /// Presence filter matching documents that lack the field
    pub fn missing() -> Self {
        TypedValue::Presence { negate: true }
    }

    pub fn date_range(begin: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        TypedValue::DateRange { begin, end }
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        TypedValue::List(items.into_iter().map(Into::into).collect())
    }
}

fn classify_object(map: &Map<String, Value>) -> Result<TypedValue, ValueError> {
    if map.len() == 1 {
        if let Some(Value::Bool(exists)) = map.get(EXISTS_KEY) {
            return Ok(TypedValue::Presence { negate: !exists });
        }
    }

    let is_range = !map.is_empty() && map.keys().all(|k| k == BEGIN_KEY || k == END_KEY);
    if is_range {
        let begin = parse_bound(BEGIN_KEY, map.get(BEGIN_KEY).unwrap_or(&Value::Null))?;
        let end = parse_bound(END_KEY, map.get(END_KEY).unwrap_or(&Value::Null))?;
        return Ok(TypedValue::DateRange { begin, end });
    }

    // Unknown shape: keep the JSON text as a scalar
    Ok(TypedValue::Scalar(Scalar::Text(
        Value::Object(map.clone()).to_string(),
    )))
}

fn to_scalar(value: &Value) -> Option<Scalar> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Scalar::Text(s.clone())),
        Value::Bool(b) => Some(Scalar::Bool(*b)),
        Value::Number(n) => Some(if let Some(i) = n.as_i64() {
            Scalar::Integer(i)
        } else if n.is_f64() {
            Scalar::Float(n.as_f64().unwrap_or_default())
        } else {
            // u64 beyond i64 range
            Scalar::Text(n.to_string())
        }),
        nested => Some(Scalar::Text(nested.to_string())),
    }
}

/// JSON type name used in error messages
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Integer(i64::from(i))
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<Scalar> for TypedValue {
    fn from(scalar: Scalar) -> Self {
        TypedValue::Scalar(scalar)
    }
}

macro_rules! scalar_into_typed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for TypedValue {
                fn from(value: $ty) -> Self {
                    TypedValue::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_into_typed!(&str, String, i64, i32, f64, bool);

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(s) => Value::String(s),
            Scalar::Integer(i) => Value::from(i),
            Scalar::Float(x) => Value::from(x),
            Scalar::Bool(b) => Value::Bool(b),
        }
    }
}

/// Canonical JSON shape; classifying the result yields the same value back.
impl From<TypedValue> for Value {
    fn from(typed: TypedValue) -> Self {
        match typed {
            TypedValue::Scalar(scalar) => scalar.into(),
            TypedValue::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            TypedValue::Presence { negate } => {
                let mut map = Map::new();
                map.insert(EXISTS_KEY.to_string(), Value::Bool(!negate));
                Value::Object(map)
            }
            TypedValue::DateRange { begin, end } => {
                let bound = |t: Option<DateTime<Utc>>| {
                    t.map(|t| Value::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
                        .unwrap_or(Value::Null)
                };
                let mut map = Map::new();
                map.insert(BEGIN_KEY.to_string(), bound(begin));
                map.insert(END_KEY.to_string(), bound(end));
                Value::Object(map)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_null_is_skipped() {
        assert_eq!(TypedValue::classify(&Value::Null).unwrap(), None);
    }

    #[test]
    fn test_scalars() {
        assert_eq!(
            TypedValue::classify(&json!("Bloomsbury")).unwrap(),
            Some(TypedValue::Scalar(Scalar::Text("Bloomsbury".into())))
        );
        assert_eq!(
            TypedValue::classify(&json!(42)).unwrap(),
            Some(TypedValue::Scalar(Scalar::Integer(42)))
        );
        assert_eq!(
            TypedValue::classify(&json!(1.5)).unwrap(),
            Some(TypedValue::Scalar(Scalar::Float(1.5)))
        );
        assert_eq!(
            TypedValue::classify(&json!(true)).unwrap(),
            Some(TypedValue::Scalar(Scalar::Bool(true)))
        );
    }

    #[test]
    fn test_whole_float_keeps_decimal_point() {
        assert_eq!(Scalar::Float(1.0).to_string(), "1.0");
        assert_eq!(Scalar::Float(2.5).to_string(), "2.5");
        assert_eq!(Scalar::Integer(1).to_string(), "1");
    }

    #[test]
    fn test_list_skips_null_items() {
        let typed = TypedValue::classify(&json!(["a", null, 3])).unwrap();
        assert_eq!(
            typed,
            Some(TypedValue::List(vec![
                Scalar::Text("a".into()),
                Scalar::Integer(3)
            ]))
        );
    }

    #[test]
    fn test_presence() {
        assert_eq!(
            TypedValue::classify(&json!({"exists": true})).unwrap(),
            Some(TypedValue::present())
        );
        assert_eq!(
            TypedValue::classify(&json!({"exists": false})).unwrap(),
            Some(TypedValue::missing())
        );
    }

    #[test]
    fn test_date_range() {
        let typed = TypedValue::classify(&json!({"begin": "2020-01-01T00:00:00Z"})).unwrap();
        assert_eq!(
            typed,
            Some(TypedValue::date_range(
                Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
                None
            ))
        );

        let open = TypedValue::classify(&json!({"begin": null, "end": null})).unwrap();
        assert_eq!(open, Some(TypedValue::date_range(None, None)));
    }

    #[test]
    fn test_bad_bound_is_an_error() {
        let err = TypedValue::classify(&json!({"end": [1, 2]})).unwrap_err();
        assert_eq!(
            err,
            ValueError::UnsupportedBound {
                bound: "end",
                kind: "array"
            }
        );
    }

    #[test]
    fn test_unknown_object_falls_back_to_text() {
        let typed = TypedValue::classify(&json!({"lang": "en"})).unwrap();
        assert_eq!(
            typed,
            Some(TypedValue::Scalar(Scalar::Text(r#"{"lang":"en"}"#.into())))
        );
    }

    #[test]
    fn test_canonical_shape_classifies_back() {
        let begin = Utc.with_ymd_and_hms(2021, 6, 1, 12, 30, 0).unwrap();
        let values = vec![
            TypedValue::from("fox"),
            TypedValue::list(["a", "b"]),
            TypedValue::missing(),
            TypedValue::date_range(Some(begin), None),
        ];

        for typed in values {
            let json: Value = typed.clone().into();
            assert_eq!(TypedValue::classify(&json).unwrap(), Some(typed));
        }
    }
}

// Insertion-ordered request parameters
use crate::error::{Result, SolrqError};
use crate::value::json_kind;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;

/// Field name → raw value mapping.
///
/// Iteration follows insertion order, which fixes the order of rendered
/// clauses. Re-inserting a field replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterSet {
    fields: IndexMap<String, Value>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field value
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(SolrqError::InvalidField(field));
        }
        self.fields.insert(field, value.into());
        Ok(())
    }

    /// Builder form of [`ParameterSet::insert`]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        self.insert(field, value)?;
        Ok(self)
    }

    /// Build from a JSON object, keeping its key order
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => {
                let mut params = Self::new();
                for (field, value) in map {
                    params.insert(field, value)?;
                }
                Ok(params)
            }
            other => Err(SolrqError::InvalidParameters(json_kind(&other).to_string())),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// True when `field` is present with a non-null value
    pub fn has_value(&self, field: &str) -> bool {
        self.get(field).is_some_and(|v| !v.is_null())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromStr for ParameterSet {
    type Err = SolrqError;

    fn from_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s).map_err(|e| SolrqError::Json {
            source: e,
            context: "Failed to parse parameters".to_string(),
        })?;
        Self::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TypedValue;
    use serde_json::json;

    #[test]
    fn test_insertion_order_is_kept() {
        let params = ParameterSet::new()
            .with("zeta", 1)
            .unwrap()
            .with("alpha", 2)
            .unwrap()
            .with("mid", 3)
            .unwrap();

        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut params = ParameterSet::new();
        params.insert("a", 1).unwrap();
        params.insert("b", 2).unwrap();
        params.insert("a", 3).unwrap();

        let pairs: Vec<(&str, &Value)> = params.iter().collect();
        assert_eq!(pairs, vec![("a", &json!(3)), ("b", &json!(2))]);
    }

    #[test]
    fn test_empty_field_rejected() {
        let mut params = ParameterSet::new();
        assert!(matches!(
            params.insert("  ", 1),
            Err(SolrqError::InvalidField(_))
        ));
    }

    #[test]
    fn test_from_json_string() {
        let params: ParameterSet = r#"{"b": null, "a": "x"}"#.parse().unwrap();
        assert_eq!(params.len(), 2);
        assert!(!params.has_value("b"));
        assert!(params.has_value("a"));
        assert_eq!(params.iter().next().map(|(k, _)| k), Some("b"));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(matches!(
            ParameterSet::from_json(json!([1, 2])),
            Err(SolrqError::InvalidParameters(kind)) if kind == "array"
        ));
    }

    #[test]
    fn test_typed_values_can_be_inserted() {
        let params = ParameterSet::new()
            .with("deleted", TypedValue::missing())
            .unwrap();
        assert_eq!(params.get("deleted"), Some(&json!({"exists": false})));
    }
}

// Field boosts for weighted full-text queries
use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in weighting used when no table is configured
pub const DEFAULT_BOOSTS: [(&str, f64); 6] = [
    ("name", 200.0),
    ("author", 20.0),
    ("authorPseudonym", 20.0),
    ("publisher", 2.0),
    ("authorizeName", 2.0),
    ("announcer", 2.0),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boost {
    pub field: String,
    pub weight: f64,
}

impl Boost {
    pub fn new(field: impl Into<String>, weight: f64) -> Self {
        Self {
            field: field.into(),
            weight,
        }
    }
}

/// Ordered field → weight table, rendered as the `qf` parameter
#[derive(Debug, Clone, PartialEq)]
pub struct BoostTable {
    boosts: Vec<Boost>,
}

impl BoostTable {
    pub fn new(boosts: Vec<Boost>) -> Self {
        Self { boosts }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Boost> {
        self.boosts.iter()
    }

    pub fn len(&self) -> usize {
        self.boosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boosts.is_empty()
    }

    /// `name^200.0 author^20.0 ...`
    pub fn to_qf(&self) -> String {
        self.to_string()
    }
}

impl Default for BoostTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_BOOSTS
                .iter()
                .map(|(field, weight)| Boost::new(*field, *weight))
                .collect(),
        )
    }
}

impl fmt::Display for BoostTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, boost) in self.boosts.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            // Debug keeps the trailing ".0" on whole weights
            write!(f, "{}^{:?}", boost.field, boost.weight)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_qf() {
        assert_eq!(
            BoostTable::default().to_qf(),
            "name^200.0 author^20.0 authorPseudonym^20.0 publisher^2.0 authorizeName^2.0 announcer^2.0"
        );
    }

    #[test]
    fn test_fractional_weights() {
        let table = BoostTable::new(vec![Boost::new("title", 1.25), Boost::new("body", 0.5)]);
        assert_eq!(table.to_qf(), "title^1.25 body^0.5");
    }
}

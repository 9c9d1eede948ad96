//! Sort specification
//!
//! An ordered list of `(field, direction)` pairs. A present but empty
//! [`SortSpec`] is meaningful: it clears whatever sort a reused query carried.

use crate::error::{Result, SolrqError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = SolrqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(SolrqError::InvalidSort(format!(
                "direction must be 'asc' or 'desc', got '{}'",
                s
            ))),
        }
    }
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortClause {
    field: String,
    direction: SortDirection,
}

impl SortClause {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Result<Self> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(SolrqError::InvalidSort("field name cannot be empty".to_string()));
        }
        Ok(Self { field, direction })
    }

    pub fn asc(field: impl Into<String>) -> Result<Self> {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Result<Self> {
        Self::new(field, SortDirection::Desc)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

impl fmt::Display for SortClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction)
    }
}

/// Ordered sort keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SortSpec {
    clauses: Vec<SortClause>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse Solr sort syntax: `"name asc, created desc"`.
    ///
    /// Blank entries between commas are skipped.
    pub fn parse(s: &str) -> Result<Self> {
        let mut spec = Self::new();
        for entry in s.split(',') {
            let mut parts = entry.split_whitespace();
            let Some(field) = parts.next() else {
                continue;
            };
            let direction = match (parts.next(), parts.next()) {
                (Some(dir), None) => dir.parse()?,
                _ => {
                    return Err(SolrqError::InvalidSort(format!(
                        "expected '<field> <asc|desc>', got '{}'",
                        entry.trim()
                    )))
                }
            };
            spec.push(SortClause::new(field, direction)?);
        }
        Ok(spec)
    }

    pub fn push(&mut self, clause: SortClause) {
        self.clauses.push(clause);
    }

    /// Builder form of [`SortSpec::push`]
    pub fn then(mut self, clause: SortClause) -> Self {
        self.push(clause);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortClause> {
        self.clauses.iter()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl FromIterator<SortClause> for SortSpec {
    fn from_iter<I: IntoIterator<Item = SortClause>>(iter: I) -> Self {
        Self {
            clauses: iter.into_iter().collect(),
        }
    }
}

impl FromStr for SortSpec {
    type Err = SolrqError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

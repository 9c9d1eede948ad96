//! Structured query output
//!
//! [`StructuredQuery`] is the backend-ready result of assembly: the primary `q`
//! string, filter queries, paging, sort keys and mode-specific parameters. It
//! mirrors the surface of a Solr client query object so that it can be reused
//! across builds.

mod boost;

pub use boost::{Boost, BoostTable, DEFAULT_BOOSTS};

use crate::sort::SortClause;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Query string that matches every document
pub const MATCH_ALL: &str = "*:*";

/// Parameter selecting the query parser
pub const PARAM_DEF_TYPE: &str = "defType";
/// Parameter carrying the field boosts
pub const PARAM_QF: &str = "qf";
pub const DISMAX: &str = "dismax";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// Every parameter becomes a conjunct of the primary query
    Default,
    /// Free text scored against the boost table, other fields filter
    WeightedFullText,
}

/// Result window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Window for a 1-based page number; page 0 is treated as page 1
    pub fn from_page(page: u64, page_size: u64) -> Self {
        let page = page.max(1);
        Self {
            offset: (page - 1).saturating_mul(page_size),
            limit: page_size,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructuredQuery {
    query: Option<String>,
    filter_queries: Vec<String>,
    start: Option<u64>,
    rows: Option<u64>,
    sorts: Vec<SortClause>,
    params: IndexMap<String, String>,
}

impl StructuredQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> &mut Self {
        self.query = Some(query.into());
        self
    }

    pub fn filter_queries(&self) -> &[String] {
        &self.filter_queries
    }

    /// Replace all filter queries
    pub fn set_filter_queries<I, S>(&mut self, filters: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_queries = filters.into_iter().map(Into::into).collect();
        self
    }

    pub fn add_filter_query(&mut self, filter: impl Into<String>) -> &mut Self {
        self.filter_queries.push(filter.into());
        self
    }

    pub fn start(&self) -> Option<u64> {
        self.start
    }

    pub fn set_start(&mut self, start: u64) -> &mut Self {
        self.start = Some(start);
        self
    }

    pub fn rows(&self) -> Option<u64> {
        self.rows
    }

    pub fn set_rows(&mut self, rows: u64) -> &mut Self {
        self.rows = Some(rows);
        self
    }

    pub fn sorts(&self) -> &[SortClause] {
        &self.sorts
    }

    pub fn clear_sorts(&mut self) -> &mut Self {
        self.sorts.clear();
        self
    }

    pub fn add_sort(&mut self, clause: SortClause) -> &mut Self {
        self.sorts.push(clause);
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn remove_param(&mut self, name: &str) -> Option<String> {
        self.params.shift_remove(name)
    }

    pub fn mode(&self) -> QueryMode {
        if self.param(PARAM_DEF_TYPE) == Some(DISMAX) {
            QueryMode::WeightedFullText
        } else {
            QueryMode::Default
        }
    }

    /// Request parameters in a stable order: `q`, extra params, `fq`, `start`,
    /// `rows`, `sort`
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Some(q) = &self.query {
            out.push(("q".to_string(), q.clone()));
        }
        for (name, value) in &self.params {
            out.push((name.clone(), value.clone()));
        }
        for fq in &self.filter_queries {
            out.push(("fq".to_string(), fq.clone()));
        }
        if let Some(start) = self.start {
            out.push(("start".to_string(), start.to_string()));
        }
        if let Some(rows) = self.rows {
            out.push(("rows".to_string(), rows.to_string()));
        }
        if !self.sorts.is_empty() {
            let sort: Vec<String> = self.sorts.iter().map(ToString::to_string).collect();
            out.push(("sort".to_string(), sort.join(",")));
        }
        out
    }

    /// URL-encoded `name=value&...` form of [`StructuredQuery::to_params`]
    pub fn to_query_string(&self) -> String {
        self.to_params()
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

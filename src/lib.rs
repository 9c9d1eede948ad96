//! solrq - Solr query assembly
//!
//! Translates a loosely-typed set of request parameters into a structured Solr
//! query: field filters, typed value handling (scalars, lists, presence checks,
//! date ranges), pagination, sort order, and a weighted full-text mode.

pub mod assembler;
pub mod cli;
pub mod config;
pub mod error;
pub mod query;
pub mod render;
pub mod sort;
pub mod value;

pub use assembler::{QueryAssembler, RenderPolicy, TEXT_FULL_KEY};
pub use error::{Result, SolrqError};
pub use query::{BoostTable, Pagination, QueryMode, StructuredQuery};
pub use sort::{SortClause, SortDirection, SortSpec};
pub use value::{ParameterSet, Scalar, TypedValue};

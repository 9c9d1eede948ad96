//! Query assembly
//!
//! Drives classification and clause rendering over a [`ParameterSet`] and
//! produces a [`StructuredQuery`]. Two modes exist:
//!
//! - Default: every rendered clause is joined with `AND` into the primary query.
//! - Weighted full-text: selected when the reserved [`TEXT_FULL_KEY`] carries a
//!   value. That value becomes the primary query, scored with the dismax parser
//!   against the boost table; every other field goes into one filter query.
//!
//! The assembler holds no mutable state, so one instance can be shared across
//! threads.

use crate::error::{Result, SolrqError};
use crate::query::{
    BoostTable, Pagination, QueryMode, StructuredQuery, DISMAX, MATCH_ALL, PARAM_DEF_TYPE,
    PARAM_QF,
};
use crate::render::{join_clauses, render};
use crate::sort::SortSpec;
use crate::value::{ParameterSet, TypedValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Reserved parameter holding the free-text query. Must not name a schema field.
pub const TEXT_FULL_KEY: &str = "text_full";

/// What to do with a field whose value cannot be classified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderPolicy {
    /// Drop the field and keep assembling
    #[default]
    Lenient,
    /// Fail the whole build
    Strict,
}

#[derive(Debug, Clone)]
pub struct QueryAssembler {
    boosts: Arc<BoostTable>,
    policy: RenderPolicy,
}

impl Default for QueryAssembler {
    fn default() -> Self {
        Self::new(Arc::new(BoostTable::default()))
    }
}

impl QueryAssembler {
    pub fn new(boosts: Arc<BoostTable>) -> Self {
        Self {
            boosts,
            policy: RenderPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RenderPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn boosts(&self) -> &BoostTable {
        &self.boosts
    }

    pub fn policy(&self) -> RenderPolicy {
        self.policy
    }

    /// Mode a parameter set will be assembled in
    pub fn mode_for(params: &ParameterSet) -> QueryMode {
        if params.has_value(TEXT_FULL_KEY) {
            QueryMode::WeightedFullText
        } else {
            QueryMode::Default
        }
    }

    /// Assemble a new query.
    ///
    /// `None` parameters mean there is nothing to build and yield `Ok(None)`.
    /// An empty parameter set yields the match-all query.
    pub fn build(
        &self,
        params: Option<&ParameterSet>,
        pagination: Option<Pagination>,
        sort: Option<&SortSpec>,
    ) -> Result<Option<StructuredQuery>> {
        let Some(params) = params else {
            tracing::info!("Query parameters are absent, nothing to build");
            return Ok(None);
        };

        let mut query = StructuredQuery::new();
        self.build_into(&mut query, params, pagination, sort)?;
        Ok(Some(query))
    }

    /// Assemble into an existing query.
    ///
    /// The primary query, filter queries and mode parameters are always
    /// replaced. Paging and sort are only touched when supplied; a supplied
    /// but empty sort clears any existing sort.
    pub fn build_into(
        &self,
        query: &mut StructuredQuery,
        params: &ParameterSet,
        pagination: Option<Pagination>,
        sort: Option<&SortSpec>,
    ) -> Result<()> {
        tracing::debug!("Query parameters: {:?}", params);

        query.set_filter_queries(Vec::<String>::new());

        if params.is_empty() {
            tracing::info!("Query parameters are empty, matching all documents");
            Self::clear_mode_params(query);
            query.set_query(MATCH_ALL);
        } else {
            match Self::mode_for(params) {
                QueryMode::Default => self.assemble_default(query, params)?,
                QueryMode::WeightedFullText => self.assemble_full_text(query, params)?,
            }
        }

        if let Some(page) = pagination {
            query.set_start(page.offset).set_rows(page.limit);
        }

        if let Some(spec) = sort {
            query.clear_sorts();
            for clause in spec.iter() {
                query.add_sort(clause.clone());
            }
        }

        tracing::info!("Assembled query: {}", query.to_query_string());
        Ok(())
    }

    fn assemble_default(&self, query: &mut StructuredQuery, params: &ParameterSet) -> Result<()> {
        tracing::info!("Assembling query in default mode");
        Self::clear_mode_params(query);

        let clauses = self.render_fields(params.iter())?;
        let joined = join_clauses(&clauses);
        if joined.is_empty() {
            tracing::debug!("No field rendered a clause, matching all documents");
            query.set_query(MATCH_ALL);
        } else {
            query.set_query(joined);
        }
        Ok(())
    }

    fn assemble_full_text(&self, query: &mut StructuredQuery, params: &ParameterSet) -> Result<()> {
        tracing::info!("Assembling query in weighted full-text mode");
        query
            .set_param(PARAM_DEF_TYPE, DISMAX)
            .set_param(PARAM_QF, self.boosts.to_qf());

        let text = params.get(TEXT_FULL_KEY).map(full_text).unwrap_or_default();
        query.set_query(text);

        let clauses =
            self.render_fields(params.iter().filter(|(field, _)| *field != TEXT_FULL_KEY))?;
        let filter = join_clauses(&clauses);
        if !filter.is_empty() {
            query.add_filter_query(filter);
        }
        Ok(())
    }

    fn render_fields<'a, I>(&self, fields: I) -> Result<Vec<String>>
    where
        I: Iterator<Item = (&'a str, &'a Value)>,
    {
        let mut clauses = Vec::new();
        for (field, raw) in fields {
            match TypedValue::classify(raw) {
                Ok(Some(typed)) => match render(field, &typed) {
                    Some(clause) => clauses.push(clause),
                    None => tracing::debug!("Field {} selects nothing, skipped", field),
                },
                Ok(None) => tracing::debug!("Field {} is null, skipped", field),
                Err(source) => match self.policy {
                    RenderPolicy::Strict => {
                        return Err(SolrqError::InvalidValue {
                            field: field.to_string(),
                            source,
                        })
                    }
                    RenderPolicy::Lenient => {
                        tracing::warn!("Dropping field {}: {}", field, source);
                    }
                },
            }
        }
        Ok(clauses)
    }

    fn clear_mode_params(query: &mut StructuredQuery) {
        query.remove_param(PARAM_DEF_TYPE);
        query.remove_param(PARAM_QF);
    }
}

/// Free text is used verbatim; non-string values use their JSON text
fn full_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Boost;
    use crate::sort::SortClause;
    use serde_json::json;

    fn params(value: Value) -> ParameterSet {
        ParameterSet::from_json(value).unwrap()
    }

    #[test]
    fn test_none_builds_nothing() {
        let assembler = QueryAssembler::default();
        assert!(assembler.build(None, None, None).unwrap().is_none());
    }

    #[test]
    fn test_empty_matches_all() {
        let assembler = QueryAssembler::default();
        let query = assembler
            .build(Some(&ParameterSet::new()), Some(Pagination::new(0, 5)), None)
            .unwrap()
            .unwrap();

        assert_eq!(query.query(), Some(MATCH_ALL));
        assert_eq!(query.rows(), Some(5));
        assert_eq!(query.mode(), QueryMode::Default);
    }

    #[test]
    fn test_default_mode_joins_clauses() {
        let assembler = QueryAssembler::default();
        let p = params(json!({
            "empty": [],
            "publisher": "Bloomsbury",
            "nothing": null,
            "open": {"begin": null, "end": null},
            "lang": ["en", "fr"],
            "trailing": null
        }));

        let query = assembler.build(Some(&p), None, None).unwrap().unwrap();
        assert_eq!(
            query.query(),
            Some("publisher:Bloomsbury AND lang:(en OR fr)")
        );
        assert!(query.filter_queries().is_empty());
        assert_eq!(query.param(PARAM_DEF_TYPE), None);
    }

    #[test]
    fn test_all_skipped_matches_all() {
        let assembler = QueryAssembler::default();
        let p = params(json!({"a": null, "b": []}));

        let query = assembler.build(Some(&p), None, None).unwrap().unwrap();
        assert_eq!(query.query(), Some(MATCH_ALL));
    }

    #[test]
    fn test_null_text_full_stays_default() {
        let p = params(json!({"text_full": null, "publisher": "Bloomsbury"}));
        assert_eq!(QueryAssembler::mode_for(&p), QueryMode::Default);

        let query = QueryAssembler::default()
            .build(Some(&p), None, None)
            .unwrap()
            .unwrap();
        assert_eq!(query.query(), Some("publisher:Bloomsbury"));
    }

    #[test]
    fn test_full_text_without_filters() {
        let p = params(json!({"text_full": "dune"}));
        let query = QueryAssembler::default()
            .build(Some(&p), None, None)
            .unwrap()
            .unwrap();

        assert_eq!(query.query(), Some("dune"));
        assert!(query.filter_queries().is_empty());
        assert_eq!(query.param(PARAM_DEF_TYPE), Some(DISMAX));
    }

    #[test]
    fn test_injected_boost_table() {
        let boosts = Arc::new(BoostTable::new(vec![Boost::new("title", 5.0)]));
        let assembler = QueryAssembler::new(boosts);
        let p = params(json!({"text_full": "dune"}));

        let query = assembler.build(Some(&p), None, None).unwrap().unwrap();
        assert_eq!(query.param(PARAM_QF), Some("title^5.0"));
    }

    #[test]
    fn test_lenient_drops_bad_field() {
        let p = params(json!({
            "created": {"begin": "not a date"},
            "publisher": "Bloomsbury"
        }));

        let query = QueryAssembler::default()
            .build(Some(&p), None, None)
            .unwrap()
            .unwrap();
        assert_eq!(query.query(), Some("publisher:Bloomsbury"));
    }

    #[test]
    fn test_strict_reports_bad_field() {
        let p = params(json!({
            "publisher": "Bloomsbury",
            "created": {"begin": "not a date"}
        }));

        let err = QueryAssembler::default()
            .with_policy(RenderPolicy::Strict)
            .build(Some(&p), None, None)
            .unwrap_err();
        assert!(matches!(err, SolrqError::InvalidValue { field, .. } if field == "created"));
    }

    #[test]
    fn test_five_digit_year_bound() {
        let p = params(json!({
            "created": {"begin": 253_402_300_800_000i64},
            "publisher": "Bloomsbury"
        }));

        let query = QueryAssembler::default()
            .build(Some(&p), None, None)
            .unwrap()
            .unwrap();
        assert_eq!(query.query(), Some("publisher:Bloomsbury"));

        let err = QueryAssembler::default()
            .with_policy(RenderPolicy::Strict)
            .build(Some(&p), None, None)
            .unwrap_err();
        assert!(matches!(err, SolrqError::InvalidValue { field, .. } if field == "created"));
    }

    #[test]
    fn test_sort_is_replaced() {
        let assembler = QueryAssembler::default();
        let mut query = StructuredQuery::new();
        query.add_sort(SortClause::desc("score").unwrap());

        let sort = SortSpec::new().then(SortClause::asc("name").unwrap());
        assembler
            .build_into(&mut query, &ParameterSet::new(), None, Some(&sort))
            .unwrap();
        assert_eq!(query.sorts(), &[SortClause::asc("name").unwrap()]);
    }

    #[test]
    fn test_absent_sort_keeps_existing() {
        let assembler = QueryAssembler::default();
        let mut query = StructuredQuery::new();
        query.add_sort(SortClause::desc("score").unwrap());

        assembler
            .build_into(&mut query, &ParameterSet::new(), None, None)
            .unwrap();
        assert_eq!(query.sorts().len(), 1);
    }

    #[test]
    fn test_assembler_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QueryAssembler>();
    }
}

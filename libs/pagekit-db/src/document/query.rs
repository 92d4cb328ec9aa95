use pagekit_query::{CompareOp, Driver, OrderBy, Predicate, SortDir, Value};
use serde_json::json;

use super::DocumentEmitter;
use crate::{DbResult, PredicateEmitter, QueryBuilder};

/// Find query over one collection, built incrementally.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct DocumentQuery {
    collection: String,
    filters: Vec<serde_json::Value>,
    order: OrderBy,
    skip: Option<u64>,
    limit: Option<u64>,
}

impl DocumentQuery {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
            order: OrderBy::empty(),
            skip: None,
            limit: None,
        }
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Combined filter document: `{}` without filters, the filter itself
    /// when there is one, `{"$and": [...]}` otherwise.
    #[must_use]
    pub fn filter(&self) -> serde_json::Value {
        match self.filters.as_slice() {
            [] => json!({}),
            [only] => only.clone(),
            many => json!({ "$and": many }),
        }
    }

    #[must_use]
    pub fn order(&self) -> &OrderBy {
        &self.order
    }

    #[must_use]
    pub fn offset(&self) -> Option<u64> {
        self.skip
    }

    #[must_use]
    pub fn max_results(&self) -> Option<u64> {
        self.limit
    }
}

impl QueryBuilder for DocumentQuery {
    fn driver(&self) -> Driver {
        Driver::Document
    }

    fn filter_equals(&mut self, field: &str, value: &Value) -> DbResult<()> {
        self.filters
            .push(DocumentEmitter.compare(field, CompareOp::Eq, value)?);
        Ok(())
    }

    fn filter_converted(&mut self, predicate: &Predicate) -> DbResult<()> {
        self.filters.push(DocumentEmitter.emit(predicate)?);
        Ok(())
    }

    fn sort(&mut self, field: &str, dir: SortDir) {
        self.order.insert(field, dir);
    }

    fn skip(&mut self, offset: u64) {
        self.skip = Some(offset);
    }

    fn limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }
}

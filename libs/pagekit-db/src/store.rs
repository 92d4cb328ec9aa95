//! Backend-erased store and query handles.

use std::fmt;
use std::sync::Arc;

use pagekit_query::{Driver, Predicate, SortDir, Value};
use sea_orm::{DatabaseConnection, JsonValue};

use crate::{DbError, DbResult, DocumentQuery, DocumentStore, QueryBuilder, SqlQuery, SqlStore};

/// A query for either backend kind.
#[derive(Clone, Debug)]
pub enum StoreQuery {
    Relational(SqlQuery),
    Document(DocumentQuery),
}

impl QueryBuilder for StoreQuery {
    fn driver(&self) -> Driver {
        match self {
            StoreQuery::Relational(q) => q.driver(),
            StoreQuery::Document(q) => q.driver(),
        }
    }

    fn filter_equals(&mut self, field: &str, value: &Value) -> DbResult<()> {
        match self {
            StoreQuery::Relational(q) => q.filter_equals(field, value),
            StoreQuery::Document(q) => q.filter_equals(field, value),
        }
    }

    fn filter_converted(&mut self, predicate: &Predicate) -> DbResult<()> {
        match self {
            StoreQuery::Relational(q) => q.filter_converted(predicate),
            StoreQuery::Document(q) => q.filter_converted(predicate),
        }
    }

    fn sort(&mut self, field: &str, dir: SortDir) {
        match self {
            StoreQuery::Relational(q) => q.sort(field, dir),
            StoreQuery::Document(q) => q.sort(field, dir),
        }
    }

    fn skip(&mut self, offset: u64) {
        match self {
            StoreQuery::Relational(q) => q.skip(offset),
            StoreQuery::Document(q) => q.skip(offset),
        }
    }

    fn limit(&mut self, limit: u64) {
        match self {
            StoreQuery::Relational(q) => q.limit(limit),
            StoreQuery::Document(q) => q.limit(limit),
        }
    }
}

/// A named backend the pagination core can count and select against.
#[derive(Clone)]
pub enum StoreHandle {
    Relational(SqlStore),
    Document(Arc<dyn DocumentStore>),
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreHandle::Relational(s) => f.debug_tuple("Relational").field(s).finish(),
            StoreHandle::Document(_) => f.write_str("Document(..)"),
        }
    }
}

impl StoreHandle {
    #[must_use]
    pub fn relational(conn: DatabaseConnection) -> Self {
        StoreHandle::Relational(SqlStore::new(conn))
    }

    pub fn document(store: impl DocumentStore + 'static) -> Self {
        StoreHandle::Document(Arc::new(store))
    }

    #[must_use]
    pub fn driver(&self) -> Driver {
        match self {
            StoreHandle::Relational(_) => Driver::Relational,
            StoreHandle::Document(_) => Driver::Document,
        }
    }

    /// Fresh, unfiltered query over a table or collection.
    #[must_use]
    pub fn query(&self, model: &str) -> StoreQuery {
        match self {
            StoreHandle::Relational(_) => StoreQuery::Relational(SqlQuery::new(model)),
            StoreHandle::Document(_) => StoreQuery::Document(DocumentQuery::new(model)),
        }
    }

    /// # Errors
    /// Returns [`DbError::BackendNotSupported`] when the query was built for
    /// the other backend kind, or the backend's own error.
    pub async fn count(&self, query: &StoreQuery) -> DbResult<u64> {
        match (self, query) {
            (StoreHandle::Relational(s), StoreQuery::Relational(q)) => s.count(q).await,
            (StoreHandle::Document(s), StoreQuery::Document(q)) => s.count(q).await,
            _ => Err(self.mismatch(query)),
        }
    }

    /// # Errors
    /// Returns [`DbError::BackendNotSupported`] when the query was built for
    /// the other backend kind, or the backend's own error.
    pub async fn select(&self, query: &StoreQuery) -> DbResult<Vec<JsonValue>> {
        match (self, query) {
            (StoreHandle::Relational(s), StoreQuery::Relational(q)) => s.select(q).await,
            (StoreHandle::Document(s), StoreQuery::Document(q)) => s.find(q).await,
            _ => Err(self.mismatch(query)),
        }
    }

    fn mismatch(&self, query: &StoreQuery) -> DbError {
        DbError::BackendNotSupported {
            expected: self.driver(),
            found: query.driver(),
        }
    }
}

use pagekit_query::{Driver, Predicate, SortDir, Value};

use crate::DbResult;

/// Query-building capability the pagination core depends on.
///
/// Filters accumulate with logical AND. Sort directives apply in call order.
pub trait QueryBuilder {
    fn driver(&self) -> Driver;

    /// Add `field == value`.
    ///
    /// # Errors
    /// Returns an error if `value` has no representation in the backend.
    fn filter_equals(&mut self, field: &str, value: &Value) -> DbResult<()>;

    /// Add a predicate produced by a filter expression converter.
    ///
    /// # Errors
    /// Returns an error if the predicate cannot be rendered for the backend.
    fn filter_converted(&mut self, predicate: &Predicate) -> DbResult<()>;

    fn sort(&mut self, field: &str, dir: SortDir);

    fn skip(&mut self, offset: u64);

    fn limit(&mut self, limit: u64);
}

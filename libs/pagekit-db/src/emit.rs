//! Rendering of neutral predicates into backend syntax.

use pagekit_query::{CompareOp, LikePattern, Predicate, Value};

use crate::DbResult;

/// One implementation per backend; only operator spelling differs, the
/// predicate structure is preserved as is (a bare comparison stays bare).
pub trait PredicateEmitter {
    type Output;

    /// # Errors
    /// Returns an error if `value` has no representation in the backend.
    fn compare(&self, field: &str, op: CompareOp, value: &Value) -> DbResult<Self::Output>;

    /// # Errors
    /// Returns an error if the pattern cannot be rendered for the backend.
    fn like(&self, field: &str, pattern: &LikePattern, negated: bool) -> DbResult<Self::Output>;

    fn and(&self, parts: Vec<Self::Output>) -> Self::Output;

    /// # Errors
    /// Propagates the first rendering error of any leaf.
    fn emit(&self, predicate: &Predicate) -> DbResult<Self::Output> {
        match predicate {
            Predicate::Compare { field, op, value } => self.compare(field, *op, value),
            Predicate::Like {
                field,
                pattern,
                negated,
            } => self.like(field, pattern, *negated),
            Predicate::And(children) => {
                let parts = children
                    .iter()
                    .map(|c| self.emit(c))
                    .collect::<DbResult<Vec<_>>>()?;
                Ok(self.and(parts))
            }
        }
    }
}

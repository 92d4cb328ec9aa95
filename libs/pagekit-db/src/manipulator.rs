//! Applies request criteria and ordering to a query builder.

use std::sync::Arc;

use pagekit_query::{ConverterRegistry, Criteria, FieldKind, OrderBy, Value};

use crate::{DbResult, QueryBuilder};

/// Routes each criterion either through a matching filter expression
/// converter or to a plain equality filter.
#[derive(Clone, Debug)]
pub struct QueryBuilderManipulator {
    registry: Arc<ConverterRegistry>,
}

impl QueryBuilderManipulator {
    #[must_use]
    pub fn new(registry: Arc<ConverterRegistry>) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// Add one filter per criterion, then one sort directive per order key.
    ///
    /// `kind_of` gives the declared kind of a field; it is used to cast
    /// plain values and converter bounds. A plain value that does not cast to
    /// its kind, such as `range[,]` on an `int` field, is compared as the
    /// literal string.
    ///
    /// # Errors
    /// Returns the converter's error or the builder's own rendering error.
    /// The builder may hold some filters when this fails.
    pub fn apply<B, K>(
        &self,
        builder: &mut B,
        criteria: &Criteria,
        order_by: &OrderBy,
        kind_of: K,
    ) -> DbResult<()>
    where
        B: QueryBuilder + ?Sized,
        K: Fn(&str) -> FieldKind,
    {
        let driver = builder.driver();

        for (field, raw) in criteria.iter() {
            let kind = kind_of(field);
            if let Some(resolved) = self.registry.resolve(driver, raw) {
                tracing::trace!(
                    field,
                    converter = resolved.converter().name(),
                    operand = resolved.operand(),
                    "filter expression"
                );
                let predicate = resolved.convert(field, kind)?;
                builder.filter_converted(&predicate)?;
            } else {
                let value = Value::parse(kind, raw).unwrap_or_else(|e| {
                    tracing::debug!(field, error = %e, "comparing as literal string");
                    Value::String(raw.to_owned())
                });
                builder.filter_equals(field, &value)?;
            }
        }

        for key in order_by.iter() {
            builder.sort(&key.field, key.dir);
        }
        Ok(())
    }
}

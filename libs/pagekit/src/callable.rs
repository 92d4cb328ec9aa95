//! Caller-supplied replacements for the count and select steps.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use pagekit_db::{StoreHandle, StoreQuery};
use pagekit_query::{Criteria, OrderBy};
use serde_json::Value as JsonValue;

/// Counts the items of a page request. Must return a non-negative integer.
#[async_trait]
pub trait CountItems: Send + Sync {
    /// # Errors
    /// Any error is surfaced as [`PaginationError::Callable`](crate::PaginationError::Callable).
    async fn count_items(&self, store: &StoreHandle, criteria: &Criteria)
    -> anyhow::Result<JsonValue>;
}

/// Arguments handed to a [`SelectItems`] callable.
#[derive(Clone, Copy, Debug)]
pub struct SelectRequest<'a> {
    pub criteria: &'a Criteria,
    pub order_by: &'a OrderBy,
    pub limit: u64,
    pub offset: u64,
}

/// Loads the items of one page. Must return a JSON array.
#[async_trait]
pub trait SelectItems: Send + Sync {
    /// # Errors
    /// Any error is surfaced as [`PaginationError::Callable`](crate::PaginationError::Callable).
    async fn select_items(
        &self,
        store: &StoreHandle,
        request: SelectRequest<'_>,
    ) -> anyhow::Result<JsonValue>;
}

/// Overrides for one fetch, in priority order: callable, then query, then
/// the internally built query.
#[derive(Clone, Default)]
pub struct Injections {
    pub count_query: Option<StoreQuery>,
    pub select_query: Option<StoreQuery>,
    pub count_items: Option<Arc<dyn CountItems>>,
    pub select_items: Option<Arc<dyn SelectItems>>,
}

impl Injections {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count_query.is_none()
            && self.select_query.is_none()
            && self.count_items.is_none()
            && self.select_items.is_none()
    }
}

impl fmt::Debug for Injections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injections")
            .field("count_query", &self.count_query)
            .field("select_query", &self.select_query)
            .field("count_items", &self.count_items.is_some())
            .field("select_items", &self.select_items.is_some())
            .finish()
    }
}

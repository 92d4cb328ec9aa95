use std::sync::Arc;

use pagekit_db::{StoreHandle, StoreQuery};
use pagekit_query::{Criteria, OrderBy};

use crate::callable::{CountItems, Injections, SelectItems};
use crate::config::ManagerConfig;
use crate::page;

/// Everything `prepare` resolved for one page request.
///
/// Immutable once built; the `with_*` methods return an updated copy.
#[derive(Clone, Debug)]
#[must_use]
pub struct PaginationContext {
    pub(crate) config: ManagerConfig,
    pub(crate) store: StoreHandle,
    pub(crate) page: u64,
    pub(crate) items_per_page: u64,
    pub(crate) criteria: Criteria,
    pub(crate) order_by: OrderBy,
    pub(crate) count_query: StoreQuery,
    pub(crate) select_query: StoreQuery,
    pub(crate) injections: Injections,
}

impl PaginationContext {
    #[must_use]
    pub fn manager_name(&self) -> &str {
        &self.config.name
    }

    #[must_use]
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    #[must_use]
    pub fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub fn items_per_page(&self) -> u64 {
        self.items_per_page
    }

    #[must_use]
    pub fn max_page_number(&self) -> u64 {
        self.config.max_page_number
    }

    #[must_use]
    pub fn item_offset(&self) -> u64 {
        page::item_offset(self.page, self.items_per_page, self.config.max_page_number)
    }

    #[must_use]
    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    #[must_use]
    pub fn order_by(&self) -> &OrderBy {
        &self.order_by
    }

    /// Internally built count query.
    #[must_use]
    pub fn count_query(&self) -> &StoreQuery {
        &self.count_query
    }

    /// Internally built select query, window included.
    #[must_use]
    pub fn select_query(&self) -> &StoreQuery {
        &self.select_query
    }

    #[must_use]
    pub fn injections(&self) -> &Injections {
        &self.injections
    }

    pub fn with_count_query(mut self, query: StoreQuery) -> Self {
        self.injections.count_query = Some(query);
        self
    }

    /// The page window is applied to `query` at fetch time.
    pub fn with_select_query(mut self, query: StoreQuery) -> Self {
        self.injections.select_query = Some(query);
        self
    }

    pub fn with_count_items(mut self, callable: Arc<dyn CountItems>) -> Self {
        self.injections.count_items = Some(callable);
        self
    }

    pub fn with_select_items(mut self, callable: Arc<dyn SelectItems>) -> Self {
        self.injections.select_items = Some(callable);
        self
    }

    pub fn with_injections(mut self, injections: Injections) -> Self {
        self.injections = injections;
        self
    }
}

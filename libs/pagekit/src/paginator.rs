//! Per-request pagination session.
//!
//! Wraps a shared [`PaginationManager`] with the two-call `prepare` / `fetch`
//! contract: fetching without a prepared request fails, the selected page is
//! kept between cycles, injected queries and callables apply to the next
//! fetch only, and every fetch leaves a [`PageSnapshot`] for rendering.

use std::collections::HashMap;
use std::mem;
use std::sync::Arc;

use pagekit_db::StoreQuery;
use pagekit_query::{Criteria, OrderBy};
use serde::de::DeserializeOwned;

use crate::callable::{CountItems, Injections, SelectItems};
use crate::context::PaginationContext;
use crate::manager::{PaginationManager, execute};
use crate::request::RequestParams;
use crate::result::{Fetched, HydrationMode, PageSnapshot, PaginationResultSet, ViewContext};
use crate::{PaginationError, PaginationResult};

#[derive(Debug)]
pub struct Paginator {
    manager: Arc<PaginationManager>,
    page: u64,
    prepared: Option<PaginationContext>,
    pending: Injections,
    current_manager: Option<String>,
    store: HashMap<String, PageSnapshot>,
}

impl Paginator {
    #[must_use]
    pub fn new(manager: Arc<PaginationManager>) -> Self {
        Self {
            manager,
            page: 1,
            prepared: None,
            pending: Injections::default(),
            current_manager: None,
            store: HashMap::new(),
        }
    }

    #[must_use]
    pub fn manager(&self) -> &PaginationManager {
        &self.manager
    }

    /// Page used when the next request carries none.
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    /// Context of the pending request, if any.
    #[must_use]
    pub fn context(&self) -> Option<&PaginationContext> {
        self.prepared.as_ref()
    }

    pub fn set_count_query(&mut self, query: StoreQuery) -> &mut Self {
        self.pending.count_query = Some(query);
        self
    }

    pub fn set_select_query(&mut self, query: StoreQuery) -> &mut Self {
        self.pending.select_query = Some(query);
        self
    }

    pub fn set_count_items(&mut self, callable: Arc<dyn CountItems>) -> &mut Self {
        self.pending.count_items = Some(callable);
        self
    }

    pub fn set_select_items(&mut self, callable: Arc<dyn SelectItems>) -> &mut Self {
        self.pending.select_items = Some(callable);
        self
    }

    /// Resolve a page request. A second call replaces the first entirely.
    ///
    /// # Errors
    /// Same as [`PaginationManager::prepare`]; the previous prepared state is
    /// kept on failure.
    pub fn prepare(
        &mut self,
        name: &str,
        request: &dyn RequestParams,
        criteria: Criteria,
        order_by: OrderBy,
        strict: bool,
    ) -> PaginationResult<&mut Self> {
        let context = self
            .manager
            .prepare_from(name, request, criteria, order_by, strict, self.page)?;
        self.page = context.page();
        self.current_manager = Some(name.to_owned());
        self.prepared = Some(context);
        Ok(self)
    }

    /// Run the prepared request, record its snapshot and return to idle.
    ///
    /// Once a prepared request runs, pending injections are consumed whether
    /// or not it succeeds.
    ///
    /// # Errors
    /// [`PaginationError::NotPrepared`] before any backend call when nothing
    /// is prepared; otherwise the errors of [`PaginationManager::fetch`].
    pub async fn fetch(&mut self, mode: HydrationMode) -> PaginationResult<Fetched> {
        let result = self.fetch_result().await?;
        Fetched::new(result, mode)
    }

    /// Fetch and deserialize the items into `T`.
    ///
    /// # Errors
    /// Same as [`Paginator::fetch`], plus [`PaginationError::Hydration`].
    pub async fn fetch_into<T: DeserializeOwned>(
        &mut self,
    ) -> PaginationResult<PaginationResultSet<T>> {
        self.fetch_result().await?.hydrate()
    }

    /// `prepare` followed by `fetch`.
    ///
    /// # Errors
    /// Any error of either step.
    pub async fn paginate(
        &mut self,
        name: &str,
        request: &dyn RequestParams,
        criteria: Criteria,
        order_by: OrderBy,
        strict: bool,
        mode: HydrationMode,
    ) -> PaginationResult<Fetched> {
        self.prepare(name, request, criteria, order_by, strict)?;
        self.fetch(mode).await
    }

    /// Name of the last prepared manager.
    #[must_use]
    pub fn current_manager_name(&self) -> Option<&str> {
        self.current_manager.as_deref()
    }

    /// Snapshots of this session's fetches, keyed by manager name.
    #[must_use]
    pub fn pagination_store(&self) -> &HashMap<String, PageSnapshot> {
        &self.store
    }

    pub fn clear_store(&mut self) {
        self.store.clear();
    }

    /// Template and snapshot for rendering the widget of manager `name`.
    ///
    /// # Errors
    /// [`PaginationError::ManagerNotFound`] for an unknown manager,
    /// [`PaginationError::SnapshotNotFound`] if it was never fetched.
    pub fn view_context(&self, name: &str) -> PaginationResult<ViewContext> {
        let config = self.manager.manager_config(name)?;
        let context = self
            .store
            .get(name)
            .copied()
            .ok_or_else(|| PaginationError::SnapshotNotFound(name.to_owned()))?;
        Ok(ViewContext {
            template: config.template,
            manager_name: name.to_owned(),
            context,
        })
    }

    /// [`Paginator::view_context`] of the last prepared manager.
    ///
    /// # Errors
    /// [`PaginationError::NotPrepared`] if no manager was ever prepared.
    pub fn default_view_context(&self) -> PaginationResult<ViewContext> {
        let name = self
            .current_manager
            .as_deref()
            .ok_or(PaginationError::NotPrepared)?;
        self.view_context(name)
    }

    async fn fetch_result(&mut self) -> PaginationResult<PaginationResultSet> {
        let Some(context) = self.prepared.take() else {
            return Err(PaginationError::NotPrepared);
        };
        let context = context.with_injections(mem::take(&mut self.pending));
        let name = context.manager_name().to_owned();

        let result = execute(context).await?;
        self.store.insert(name, result.snapshot());
        Ok(result)
    }
}

//! Shared pagination manager: resolves configuration, prepares request
//! contexts and runs count-then-select.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use pagekit_db::{QueryBuilder, QueryBuilderManipulator, StoreHandle, StoreQuery};
use pagekit_query::{
    ConverterRegistration, ConverterRegistry, Criteria, FilterExpressionConverter, OrderBy,
    SortDir,
};
use serde_json::Value as JsonValue;

use crate::callable::{Injections, SelectRequest};
use crate::config::{ManagerConfig, PaginationConfig};
use crate::context::PaginationContext;
use crate::page;
use crate::request::{RequestParams, positive_int, split_list};
use crate::result::{Fetched, HydrationMode, PaginationResultSet};
use crate::{PaginationError, PaginationResult};

/// Stateless across requests; share it behind an `Arc`.
#[derive(Debug)]
pub struct PaginationManager {
    config: PaginationConfig,
    stores: HashMap<String, StoreHandle>,
    models: HashSet<String>,
    manipulator: QueryBuilderManipulator,
}

#[derive(Debug)]
#[must_use]
pub struct PaginationManagerBuilder {
    config: PaginationConfig,
    stores: HashMap<String, StoreHandle>,
    models: HashSet<String>,
    converters: HashMap<String, Arc<dyn FilterExpressionConverter>>,
}

impl PaginationManagerBuilder {
    /// Register a store under the name managers refer to in `model_manager_name`.
    pub fn store(mut self, name: impl Into<String>, store: StoreHandle) -> Self {
        self.stores.insert(name.into(), store);
        self
    }

    /// Allow `class` to be paginated without a named manager configuration.
    pub fn model(mut self, class: impl Into<String>) -> Self {
        self.models.insert(class.into());
        self
    }

    /// Make a converter available to `query_expr_converters` entries.
    pub fn converter(
        mut self,
        name: impl Into<String>,
        converter: Arc<dyn FilterExpressionConverter>,
    ) -> Self {
        self.converters.insert(name.into(), converter);
        self
    }

    /// # Errors
    /// Returns [`PaginationError::InvalidConfig`] if a configured converter
    /// name is unknown, its registration is invalid, or it names a built-in
    /// converter with a pattern that has no group for the operand.
    pub fn build(self) -> PaginationResult<PaginationManager> {
        let mut registry = ConverterRegistry::with_builtins();

        for entry in &self.config.query_expr_converters {
            let (converter, builtin) = match self.converters.get(&entry.converter) {
                Some(converter) => (Arc::clone(converter), false),
                None => ConverterRegistry::builtin(&entry.converter)
                    .map(|converter| (converter, true))
                    .ok_or_else(|| {
                        PaginationError::InvalidConfig(format!(
                            "unknown query expression converter `{}`",
                            entry.converter
                        ))
                    })?,
            };
            let registration =
                ConverterRegistration::new(&entry.db_drivers, &entry.pattern, converter)
                    .map_err(|e| PaginationError::InvalidConfig(e.to_string()))?;
            if builtin && !registration.captures_operand() {
                return Err(PaginationError::InvalidConfig(format!(
                    "pattern `{}` must capture the operand of the built-in `{}` converter in a group",
                    entry.pattern, entry.converter
                )));
            }
            registry.push(registration);
        }

        Ok(PaginationManager {
            config: self.config,
            stores: self.stores,
            models: self.models,
            manipulator: QueryBuilderManipulator::new(Arc::new(registry)),
        })
    }
}

impl PaginationManager {
    pub fn builder(config: PaginationConfig) -> PaginationManagerBuilder {
        PaginationManagerBuilder {
            config,
            stores: HashMap::new(),
            models: HashSet::new(),
            converters: HashMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &ConverterRegistry {
        self.manipulator.registry()
    }

    /// Named configuration first, then defaults for a registered model type.
    ///
    /// # Errors
    /// Returns [`PaginationError::ManagerNotFound`] when `name` is neither.
    pub fn manager_config(&self, name: &str) -> PaginationResult<ManagerConfig> {
        if let Some(config) = self.config.named(name) {
            return Ok(config);
        }
        if self.models.contains(name) {
            return Ok(self.config.for_model(name));
        }
        Err(PaginationError::ManagerNotFound(name.to_owned()))
    }

    /// Resolve one page request into a [`PaginationContext`], starting from page 1.
    ///
    /// # Errors
    /// Configuration, store, sort-attribute and filter conversion errors.
    pub fn prepare(
        &self,
        name: &str,
        request: &dyn RequestParams,
        criteria: Criteria,
        order_by: OrderBy,
        strict: bool,
    ) -> PaginationResult<PaginationContext> {
        self.prepare_from(name, request, criteria, order_by, strict, 1)
    }

    /// Same as [`PaginationManager::prepare`], with `current_page` used when
    /// the request carries no valid page.
    pub(crate) fn prepare_from(
        &self,
        name: &str,
        request: &dyn RequestParams,
        criteria: Criteria,
        order_by: OrderBy,
        strict: bool,
        current_page: u64,
    ) -> PaginationResult<PaginationContext> {
        let config = self.manager_config(name)?;
        let store = self.store_for(&config)?;
        let query_map = &config.request.query_map;

        let page =
            positive_int(request.query_or_attribute(&query_map.page)).unwrap_or(current_page);
        let page = page::clamp_page(page, config.max_page_number);
        let items_per_page = positive_int(request.query_or_attribute(&query_map.item_per_page))
            .unwrap_or(config.item_per_page);
        let order_by = resolve_sort(&config, request, order_by, strict)?;

        let kind_of = |field: &str| config.field_kind(field);
        let mut count_query = store.query(&config.class);
        self.manipulator
            .apply(&mut count_query, &criteria, &OrderBy::empty(), kind_of)?;
        let mut select_query = store.query(&config.class);
        self.manipulator
            .apply(&mut select_query, &criteria, &order_by, kind_of)?;
        select_query.skip(page::item_offset(page, items_per_page, config.max_page_number));
        select_query.limit(items_per_page);

        tracing::debug!(
            manager = name,
            page,
            items_per_page,
            criteria = criteria.len(),
            order_by = %order_by,
            "pagination prepared"
        );

        Ok(PaginationContext {
            config,
            store,
            page,
            items_per_page,
            criteria,
            order_by,
            count_query,
            select_query,
            injections: Injections::default(),
        })
    }

    /// Run the prepared request and shape the page per `mode`.
    ///
    /// # Errors
    /// Backend errors, callable failures and [`PaginationError::UnexpectedValue`]
    /// when a callable returns the wrong shape.
    pub async fn fetch(
        &self,
        context: PaginationContext,
        mode: HydrationMode,
    ) -> PaginationResult<Fetched> {
        Fetched::new(execute(context).await?, mode)
    }

    /// `prepare` followed by `fetch`.
    ///
    /// # Errors
    /// Any error of either step.
    pub async fn paginate(
        &self,
        name: &str,
        request: &dyn RequestParams,
        criteria: Criteria,
        order_by: OrderBy,
        strict: bool,
        mode: HydrationMode,
    ) -> PaginationResult<Fetched> {
        let context = self.prepare(name, request, criteria, order_by, strict)?;
        self.fetch(context, mode).await
    }

    fn store_for(&self, config: &ManagerConfig) -> PaginationResult<StoreHandle> {
        let store = self.stores.get(&config.store).ok_or_else(|| {
            PaginationError::InvalidConfig(format!("no store registered as `{}`", config.store))
        })?;
        if store.driver() != config.db_driver {
            return Err(PaginationError::BackendNotSupported {
                expected: config.db_driver,
                found: store.driver(),
            });
        }
        Ok(store.clone())
    }
}

/// Validate requested sort attributes against the whitelist and merge them
/// after the caller's ordering.
fn resolve_sort(
    config: &ManagerConfig,
    request: &dyn RequestParams,
    order_by: OrderBy,
    strict: bool,
) -> PaginationResult<OrderBy> {
    let query_map = &config.request.query_map;
    let sort = &config.request.sort;
    let requested = split_list(request.query_or_attribute(&query_map.sort), &sort.delimiter);
    let desc = split_list(request.query_or_attribute(&query_map.desc), &sort.delimiter);

    let mut derived = OrderBy::empty();
    for attribute in requested {
        if !sort.attributes_availables.contains(&attribute) {
            if strict {
                return Err(PaginationError::SortAttributeNotAvailable(attribute));
            }
            tracing::warn!(
                manager = %config.name,
                attribute = %attribute,
                "sort attribute not available, ignored"
            );
            continue;
        }
        let dir = if desc.contains(&attribute) {
            SortDir::Desc
        } else {
            SortDir::Asc
        };
        derived.insert(attribute, dir);
    }

    Ok(if derived.is_empty() {
        order_by
    } else {
        order_by.merge(derived)
    })
}

pub(crate) async fn execute(
    context: PaginationContext,
) -> PaginationResult<PaginationResultSet> {
    let PaginationContext {
        config,
        store,
        page,
        items_per_page,
        criteria,
        order_by,
        count_query,
        select_query,
        injections,
    } = context;
    let item_offset = page::item_offset(page, items_per_page, config.max_page_number);

    let total_items = count(&store, &criteria, &count_query, &injections).await?;

    let items = if total_items == 0 {
        Vec::new()
    } else {
        let request = SelectRequest {
            criteria: &criteria,
            order_by: &order_by,
            limit: items_per_page,
            offset: item_offset,
        };
        select(&store, request, &select_query, &injections).await?
    };

    let total_pages = page::total_pages(total_items, items_per_page);
    tracing::debug!(
        manager = %config.name,
        page,
        total_items,
        total_pages,
        items = items.len(),
        "pagination fetched"
    );

    Ok(PaginationResultSet {
        page,
        items_per_page,
        order_by,
        item_offset,
        total_items,
        total_pages,
        items,
    })
}

async fn count(
    store: &StoreHandle,
    criteria: &Criteria,
    internal: &StoreQuery,
    injections: &Injections,
) -> PaginationResult<u64> {
    if let Some(callable) = &injections.count_items {
        let value = callable
            .count_items(store, criteria)
            .await
            .map_err(PaginationError::Callable)?;
        return value.as_u64().ok_or(PaginationError::UnexpectedValue(
            "count_items callable must return a non-negative integer",
        ));
    }
    let query = injections.count_query.as_ref().unwrap_or(internal);
    Ok(store.count(query).await?)
}

async fn select(
    store: &StoreHandle,
    request: SelectRequest<'_>,
    internal: &StoreQuery,
    injections: &Injections,
) -> PaginationResult<Vec<JsonValue>> {
    if let Some(callable) = &injections.select_items {
        let value = callable
            .select_items(store, request)
            .await
            .map_err(PaginationError::Callable)?;
        return match value {
            JsonValue::Array(items) => Ok(items),
            _ => Err(PaginationError::UnexpectedValue(
                "select_items callable must return an array",
            )),
        };
    }
    if let Some(injected) = &injections.select_query {
        let mut query = injected.clone();
        query.skip(request.offset);
        query.limit(request.limit);
        return Ok(store.select(&query).await?);
    }
    Ok(store.select(internal).await?)
}

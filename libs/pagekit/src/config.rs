//! Pagination configuration.
//!
//! Loaded from the `pagination` key of a [`Figment`]; a missing key yields
//! the defaults.
//!
//! ```yaml
//! pagination:
//!   db_driver: relational
//!   item_per_page: 10
//!   max_page_number: 400
//!   request:
//!     query_map: { page: page, item_per_page: item_per_page, sort: sort, desc: desc }
//!     sort: { delimiter: ",", attributes_availables: [name, created_at] }
//!   query_expr_converters:
//!     - { db_drivers: [relational], pattern: "^between.+$", converter: between }
//!   pagination_managers:
//!     users:
//!       class: users
//!       item_per_page: 20
//!       fields: { age: int, created_at: datetime }
//! ```

use std::collections::HashMap;

use figment::Figment;
use pagekit_query::{Driver, FieldKind};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{PaginationError, PaginationResult};

/// Figment key the configuration lives under.
pub const CONFIG_KEY: &str = "pagination";

pub const DEFAULT_ITEM_PER_PAGE: u64 = 10;
pub const DEFAULT_MAX_PAGE_NUMBER: u64 = 400;
pub const DEFAULT_STORE: &str = "default";
pub const DEFAULT_DELIMITER: &str = ",";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PaginationConfig {
    pub db_driver: Driver,
    /// Name of the store used by managers that do not pick their own.
    pub model_manager_name: String,
    pub item_per_page: u64,
    pub max_page_number: u64,
    pub template: Option<String>,
    pub request: RequestConfig,
    /// Deprecated, folded into `request.sort` on load.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<LegacySortConfig>,
    /// Appended after the built-in converters, in this order.
    pub query_expr_converters: Vec<ConverterConfig>,
    pub pagination_managers: HashMap<String, ManagerOptions>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            db_driver: Driver::default(),
            model_manager_name: DEFAULT_STORE.to_owned(),
            item_per_page: DEFAULT_ITEM_PER_PAGE,
            max_page_number: DEFAULT_MAX_PAGE_NUMBER,
            template: None,
            request: RequestConfig::default(),
            sort: None,
            query_expr_converters: Vec::new(),
            pagination_managers: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RequestConfig {
    pub query_map: QueryMap,
    pub sort: SortConfig,
}

/// Request parameter names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct QueryMap {
    pub page: String,
    pub item_per_page: String,
    pub sort: String,
    pub desc: String,
}

impl Default for QueryMap {
    fn default() -> Self {
        Self {
            page: "page".to_owned(),
            item_per_page: "item_per_page".to_owned(),
            sort: "sort".to_owned(),
            desc: "desc".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SortConfig {
    pub delimiter: String,
    /// Whitelist of sortable attributes.
    pub attributes_availables: Vec<String>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_owned(),
            attributes_availables: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LegacySortConfig {
    pub delimiter: Option<String>,
    pub attributes_availables: Vec<String>,
}

/// Extra converter registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConverterConfig {
    pub db_drivers: Vec<Driver>,
    pub pattern: String,
    /// Built-in converter name or a name registered on the manager builder.
    pub converter: String,
}

/// Per-manager overrides of the global options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ManagerOptions {
    /// Table or collection; defaults to the manager name.
    pub class: Option<String>,
    pub db_driver: Option<Driver>,
    pub model_manager_name: Option<String>,
    pub item_per_page: Option<u64>,
    pub max_page_number: Option<u64>,
    pub template: Option<String>,
    pub request: Option<RequestConfig>,
    pub fields: HashMap<String, FieldKind>,
}

/// Fully resolved options of one pagination manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    pub name: String,
    pub class: String,
    pub db_driver: Driver,
    /// Registered store the manager reads from.
    pub store: String,
    pub item_per_page: u64,
    pub max_page_number: u64,
    pub template: Option<String>,
    pub request: RequestConfig,
    pub fields: HashMap<String, FieldKind>,
}

impl ManagerConfig {
    /// Declared kind of `field`; undeclared fields are strings.
    #[must_use]
    pub fn field_kind(&self, field: &str) -> FieldKind {
        self.fields.get(field).copied().unwrap_or_default()
    }
}

impl PaginationConfig {
    /// Load from the [`CONFIG_KEY`] section, fold deprecated options and validate.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidConfig`] if the section cannot be
    /// deserialized or fails validation.
    pub fn from_figment(figment: &Figment) -> PaginationResult<Self> {
        let config = if figment.contains(CONFIG_KEY) {
            figment
                .extract_inner::<Self>(CONFIG_KEY)
                .map_err(|e| PaginationError::InvalidConfig(e.to_string()))?
        } else {
            Self::default()
        };
        config.normalized().validated()
    }

    /// Fold the deprecated top-level `sort` block into `request.sort`.
    ///
    /// The legacy delimiter wins only while the request delimiter is the
    /// default; legacy attributes only fill an empty request list.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let Some(legacy) = self.sort.take() else {
            return self;
        };
        if legacy.delimiter.is_none() && legacy.attributes_availables.is_empty() {
            return self;
        }
        tracing::warn!(
            "`pagination.sort` is deprecated; use `pagination.request.sort` instead"
        );

        let sort = &mut self.request.sort;
        if let Some(delimiter) = legacy.delimiter
            && sort.delimiter == DEFAULT_DELIMITER
        {
            sort.delimiter = delimiter;
        }
        if sort.attributes_availables.is_empty() {
            sort.attributes_availables = legacy.attributes_availables;
        }
        self
    }

    /// # Errors
    /// Returns [`PaginationError::InvalidConfig`] naming the first bad option.
    pub fn validated(self) -> PaginationResult<Self> {
        let invalid = |msg: String| Err(PaginationError::InvalidConfig(msg));

        if self.item_per_page == 0 {
            return invalid("item_per_page must be at least 1".to_owned());
        }
        if self.max_page_number == 0 {
            return invalid("max_page_number must be at least 1".to_owned());
        }
        if self.request.sort.delimiter.is_empty() {
            return invalid("request.sort.delimiter must not be empty".to_owned());
        }
        for conv in &self.query_expr_converters {
            if conv.db_drivers.is_empty() {
                return invalid(format!("converter `{}` has no db_drivers", conv.converter));
            }
            if let Err(e) = Regex::new(&conv.pattern) {
                return invalid(format!("converter `{}` pattern: {e}", conv.converter));
            }
        }
        for (name, opts) in &self.pagination_managers {
            if opts.item_per_page == Some(0) {
                return invalid(format!("{name}.item_per_page must be at least 1"));
            }
            if opts.max_page_number == Some(0) {
                return invalid(format!("{name}.max_page_number must be at least 1"));
            }
            if opts
                .request
                .as_ref()
                .is_some_and(|r| r.sort.delimiter.is_empty())
            {
                return invalid(format!("{name}.request.sort.delimiter must not be empty"));
            }
        }
        Ok(self)
    }

    /// Resolved options of a configured manager, or `None` if `name` is not configured.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<ManagerConfig> {
        let opts = self.pagination_managers.get(name)?;

        let (db_driver, store) = match (&opts.model_manager_name, opts.db_driver) {
            (Some(store), Some(driver)) => (driver, store.clone()),
            _ => (self.db_driver, self.model_manager_name.clone()),
        };

        Some(ManagerConfig {
            name: name.to_owned(),
            class: opts.class.clone().unwrap_or_else(|| name.to_owned()),
            db_driver,
            store,
            item_per_page: opts.item_per_page.unwrap_or(self.item_per_page),
            max_page_number: opts.max_page_number.unwrap_or(self.max_page_number),
            template: opts.template.clone().or_else(|| self.template.clone()),
            request: opts.request.clone().unwrap_or_else(|| self.request.clone()),
            fields: opts.fields.clone(),
        })
    }

    /// Default options for a model type paginated without a named configuration.
    #[must_use]
    pub fn for_model(&self, class: &str) -> ManagerConfig {
        ManagerConfig {
            name: class.to_owned(),
            class: class.to_owned(),
            db_driver: self.db_driver,
            store: self.model_manager_name.clone(),
            item_per_page: self.item_per_page,
            max_page_number: self.max_page_number,
            template: self.template.clone(),
            request: self.request.clone(),
            fields: HashMap::new(),
        }
    }
}

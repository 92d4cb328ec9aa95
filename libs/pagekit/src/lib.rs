#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Request-driven pagination over relational and document stores.
//!
//! A shared [`PaginationManager`] holds the configuration, the registered
//! stores and the filter expression converters. Each request either uses it
//! directly (`prepare` returns an immutable [`PaginationContext`], `fetch`
//! consumes it) or goes through a [`Paginator`] session that keeps the
//! prepare/fetch state, the selected page and the page snapshots.
//!
//! ```ignore
//! let manager = Arc::new(
//!     PaginationManager::builder(PaginationConfig::from_figment(&figment)?)
//!         .store("default", StoreHandle::relational(conn))
//!         .build()?,
//! );
//! let request = PaginationRequest::from_query_str("page=2&sort=name&desc=name")?;
//! let criteria = Criteria::new().with("age", "range[18,65[");
//!
//! let mut paginator = Paginator::new(manager);
//! let page = paginator
//!     .paginate("users", &request, criteria, OrderBy::empty(), true, HydrationMode::Object)
//!     .await?;
//! ```

pub mod callable;
pub mod config;
pub mod context;
pub mod error;
pub mod manager;
pub mod page;
pub mod paginator;
pub mod request;
pub mod result;

pub use callable::{CountItems, Injections, SelectItems, SelectRequest};
pub use config::{ManagerConfig, ManagerOptions, PaginationConfig};
pub use context::PaginationContext;
pub use error::{PaginationError, PaginationResult};
pub use manager::{PaginationManager, PaginationManagerBuilder};
pub use paginator::Paginator;
pub use request::{PaginationRequest, RequestParams};
pub use result::{Fetched, HydrationMode, PageSnapshot, PaginationResultSet, ViewContext};

pub use pagekit_db::{StoreHandle, StoreQuery};
pub use pagekit_query::{Criteria, Driver, FieldKind, OrderBy, SortDir};

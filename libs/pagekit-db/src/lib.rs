#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Backend side of pagekit.
//!
//! - [`QueryBuilder`]: the capability the pagination core builds queries through
//! - [`PredicateEmitter`]: renders a neutral [`Predicate`](pagekit_query::Predicate) into
//!   backend syntax, with [`SqlEmitter`] (sea-query expression trees) and
//!   [`DocumentEmitter`] (operator documents)
//! - [`StoreHandle`] / [`StoreQuery`]: a store and a query for it, relational or document
//! - [`QueryBuilderManipulator`]: applies criteria and ordering through the converter registry

#![cfg_attr(
    not(any(feature = "pg", feature = "mysql", feature = "sqlite")),
    allow(unused_imports, dead_code)
)]

pub mod builder;
pub mod document;
pub mod emit;
pub mod manipulator;
pub mod sql;
pub mod store;

pub use builder::QueryBuilder;
pub use document::{DocumentEmitter, DocumentQuery, DocumentStore, MemoryDocumentStore};
pub use emit::PredicateEmitter;
pub use manipulator::QueryBuilderManipulator;
pub use sql::{SqlEmitter, SqlQuery, SqlStore};
pub use store::{StoreHandle, StoreQuery};

use pagekit_query::{Driver, FilterError};
use thiserror::Error;

/// Library-local result type.
pub type DbResult<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// A query was handed to a store of another kind.
    #[error("{found} query cannot run on a {expected} store")]
    BackendNotSupported { expected: Driver, found: Driver },

    #[error("invalid decimal: {0}")]
    InvalidDecimal(String),

    #[error("negative row count: {0}")]
    InvalidCount(i64),

    #[error("unsupported document filter: {0}")]
    InvalidDocumentFilter(String),

    #[error(transparent)]
    Sea(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

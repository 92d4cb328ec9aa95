use pagekit_db::DbError;
use pagekit_query::{Driver, FilterError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaginationError {
    #[error("the \"{0}\" configuration key is not attached to a pagination manager")]
    ManagerNotFound(String),

    #[error("invalid pagination configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid request sort attribute \"{0}\": not available")]
    SortAttributeNotAvailable(String),

    /// `fetch` was called with no prepared request.
    #[error("unable to fetch a page without preparing it first")]
    NotPrepared,

    /// An injected callable returned a value of the wrong shape.
    #[error("unexpected value: {0}")]
    UnexpectedValue(&'static str),

    #[error("backend mismatch: expected {expected}, found {found}")]
    BackendNotSupported { expected: Driver, found: Driver },

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("database error: {0}")]
    Db(DbError),

    #[error("pagination callable failed: {0:#}")]
    Callable(anyhow::Error),

    #[error("cannot hydrate page items: {0}")]
    Hydration(#[from] serde_json::Error),

    #[error("invalid request query: {0}")]
    InvalidRequest(#[from] serde_urlencoded::de::Error),

    #[error("no pagination snapshot stored for \"{0}\"")]
    SnapshotNotFound(String),
}

impl From<DbError> for PaginationError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Filter(f) => PaginationError::Filter(f),
            DbError::BackendNotSupported { expected, found } => {
                PaginationError::BackendNotSupported { expected, found }
            }
            other => PaginationError::Db(other),
        }
    }
}

pub type PaginationResult<T> = std::result::Result<T, PaginationError>;

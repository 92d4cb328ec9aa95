//! Document backend: operator documents (`$gte`, `$regex`, `$and`, ...).

mod emitter;
mod memory;
mod query;

pub use emitter::{DocumentEmitter, regex_pattern, to_json};
pub use memory::MemoryDocumentStore;
pub use query::DocumentQuery;

use async_trait::async_trait;
use sea_orm::JsonValue;

use crate::DbResult;

/// Executes document queries against some collection store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Number of documents matching the query filter. Sort and window are ignored.
    ///
    /// # Errors
    /// Returns an error if the filter cannot be evaluated by the store.
    async fn count(&self, query: &DocumentQuery) -> DbResult<u64>;

    /// # Errors
    /// Returns an error if the filter cannot be evaluated by the store.
    async fn find(&self, query: &DocumentQuery) -> DbResult<Vec<JsonValue>>;
}

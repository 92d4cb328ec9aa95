//! Relational backend: sea-query expression trees executed through sea-orm.

mod emitter;
mod query;
mod store;

pub use emitter::{SqlEmitter, like_pattern, to_sea_value};
pub use query::SqlQuery;
pub use store::SqlStore;

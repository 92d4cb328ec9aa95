use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult, JsonValue};

use super::SqlQuery;
use crate::{DbError, DbResult};

/// Relational store over a sea-orm connection.
///
/// Rows come back as JSON objects keyed by column name.
#[derive(Clone, Debug)]
pub struct SqlStore {
    conn: DatabaseConnection,
}

impl SqlStore {
    #[must_use]
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    #[must_use]
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// # Errors
    /// Returns [`DbError::Sea`] when the statement fails.
    pub async fn count(&self, query: &SqlQuery) -> DbResult<u64> {
        let backend = self.conn.get_database_backend();
        let stmt = backend.build(&query.count_statement());
        tracing::trace!(sql = %stmt.sql, "count");
        let count: i64 = match self.conn.query_one(stmt).await? {
            Some(row) => row.try_get("", "count")?,
            None => 0,
        };
        u64::try_from(count).map_err(|_| DbError::InvalidCount(count))
    }

    /// # Errors
    /// Returns [`DbError::Sea`] when the statement fails.
    pub async fn select(&self, query: &SqlQuery) -> DbResult<Vec<JsonValue>> {
        let backend = self.conn.get_database_backend();
        let stmt = backend.build(&query.select_statement());
        tracing::trace!(sql = %stmt.sql, "select");
        Ok(JsonValue::find_by_statement(stmt).all(&self.conn).await?)
    }
}

use pagekit_query::{CompareOp, Driver, OrderBy, Predicate, SortDir, Value};
use sea_orm::Condition;
use sea_orm::sea_query::{Alias, Asterisk, Expr, Func, Order, Query, SelectStatement};

use super::SqlEmitter;
use crate::{DbResult, PredicateEmitter, QueryBuilder};

/// Select query over one table, built incrementally.
#[derive(Clone, Debug)]
#[must_use]
pub struct SqlQuery {
    table: String,
    condition: Condition,
    order: OrderBy,
    offset: Option<u64>,
    limit: Option<u64>,
}

impl SqlQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            condition: Condition::all(),
            order: OrderBy::empty(),
            offset: None,
            limit: None,
        }
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    #[must_use]
    pub fn order(&self) -> &OrderBy {
        &self.order
    }

    #[must_use]
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    #[must_use]
    pub fn max_results(&self) -> Option<u64> {
        self.limit
    }

    /// `SELECT *` with filters, ordering and the page window.
    #[must_use]
    pub fn select_statement(&self) -> SelectStatement {
        let mut stmt = Query::select();
        stmt.column(Asterisk).from(Alias::new(self.table.as_str()));
        if !self.condition.is_empty() {
            stmt.cond_where(self.condition.clone());
        }
        for key in self.order.iter() {
            let order = match key.dir {
                SortDir::Asc => Order::Asc,
                SortDir::Desc => Order::Desc,
            };
            stmt.order_by(Alias::new(key.field.as_str()), order);
        }
        if let Some(limit) = self.limit {
            stmt.limit(limit);
        }
        if let Some(offset) = self.offset {
            stmt.offset(offset);
        }
        stmt
    }

    /// `SELECT COUNT(*) AS count` with the same filters; ordering and window are ignored.
    #[must_use]
    pub fn count_statement(&self) -> SelectStatement {
        let mut stmt = Query::select();
        stmt.expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
            .from(Alias::new(self.table.as_str()));
        if !self.condition.is_empty() {
            stmt.cond_where(self.condition.clone());
        }
        stmt
    }

    fn and_where(&mut self, expr: sea_orm::sea_query::SimpleExpr) {
        let cond = std::mem::replace(&mut self.condition, Condition::all());
        self.condition = cond.add(expr);
    }
}

impl QueryBuilder for SqlQuery {
    fn driver(&self) -> Driver {
        Driver::Relational
    }

    fn filter_equals(&mut self, field: &str, value: &Value) -> DbResult<()> {
        let expr = SqlEmitter.compare(field, CompareOp::Eq, value)?;
        self.and_where(expr);
        Ok(())
    }

    fn filter_converted(&mut self, predicate: &Predicate) -> DbResult<()> {
        let expr = SqlEmitter.emit(predicate)?;
        self.and_where(expr);
        Ok(())
    }

    fn sort(&mut self, field: &str, dir: SortDir) {
        self.order.insert(field, dir);
    }

    fn skip(&mut self, offset: u64) {
        self.offset = Some(offset);
    }

    fn limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }
}

use bigdecimal::BigDecimal;
use pagekit_query::{CompareOp, LikePattern, LikeToken, Value};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Alias, Expr, LikeExpr, SimpleExpr};

use crate::{DbError, DbResult, PredicateEmitter};

/// Renders predicates as sea-query expressions.
///
/// `And` nodes become a left-folded chain of `AND` binaries; a single
/// comparison stays a bare binary expression.
#[derive(Clone, Copy, Debug, Default)]
pub struct SqlEmitter;

impl PredicateEmitter for SqlEmitter {
    type Output = SimpleExpr;

    fn compare(&self, field: &str, op: CompareOp, value: &Value) -> DbResult<SimpleExpr> {
        let col = Expr::col(Alias::new(field));
        let v = to_sea_value(value)?;
        Ok(match op {
            CompareOp::Eq => col.eq(v),
            CompareOp::Gt => col.gt(v),
            CompareOp::Ge => col.gte(v),
            CompareOp::Lt => col.lt(v),
            CompareOp::Le => col.lte(v),
        })
    }

    fn like(&self, field: &str, pattern: &LikePattern, negated: bool) -> DbResult<SimpleExpr> {
        let col = Expr::col(Alias::new(field));
        let like = LikeExpr::new(like_pattern(pattern)).escape('\\');
        Ok(if negated {
            col.not_like(like)
        } else {
            col.like(like)
        })
    }

    fn and(&self, parts: Vec<SimpleExpr>) -> SimpleExpr {
        parts
            .into_iter()
            .reduce(SimpleExpr::and)
            .unwrap_or_else(|| Expr::value(true))
    }
}

/// SQL `LIKE` pattern for a wildcard term, escaping `%`, `_` and `\` in literal runs.
#[must_use]
pub fn like_pattern(pattern: &LikePattern) -> String {
    let mut out = String::new();
    for token in pattern.tokens() {
        match token {
            LikeToken::Literal(text) => {
                for ch in text.chars() {
                    if matches!(ch, '%' | '_' | '\\') {
                        out.push('\\');
                    }
                    out.push(ch);
                }
            }
            LikeToken::AnyChars => out.push('%'),
            LikeToken::AnyChar => out.push('_'),
        }
    }
    out
}

/// Bind value for a typed literal.
///
/// # Errors
/// Returns [`DbError::InvalidDecimal`] when a decimal exceeds what the
/// database decimal type can hold.
pub fn to_sea_value(value: &Value) -> DbResult<sea_orm::Value> {
    Ok(match value {
        Value::Bool(b) => sea_orm::Value::Bool(Some(*b)),
        Value::I64(i) => sea_orm::Value::BigInt(Some(*i)),
        Value::F64(f) => sea_orm::Value::Double(Some(*f)),
        Value::Decimal(d) => sea_orm::Value::Decimal(Some(Box::new(bigdecimal_to_decimal(d)?))),
        Value::String(s) => sea_orm::Value::String(Some(Box::new(s.clone()))),
        Value::Uuid(u) => sea_orm::Value::Uuid(Some(Box::new(*u))),
        Value::DateTime(dt) => sea_orm::Value::ChronoDateTimeUtc(Some(Box::new(*dt))),
        Value::Date(d) => sea_orm::Value::ChronoDate(Some(Box::new(*d))),
        Value::Time(t) => sea_orm::Value::ChronoTime(Some(Box::new(*t))),
    })
}

fn bigdecimal_to_decimal(bd: &BigDecimal) -> DbResult<Decimal> {
    // Round-trip through text to keep the scale.
    let s = bd.normalized().to_string();
    Decimal::from_str_exact(&s)
        .or_else(|_| s.parse::<Decimal>())
        .map_err(|_| DbError::InvalidDecimal(s))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use pagekit_query::{FieldKind, Predicate};
    use sea_orm::sea_query::{BinOper, Query, SqliteQueryBuilder};

    fn render(expr: SimpleExpr) -> String {
        Query::select()
            .column(Alias::new("id"))
            .from(Alias::new("t"))
            .and_where(expr)
            .to_string(SqliteQueryBuilder)
    }

    #[test]
    fn like_pattern_maps_wildcards_and_escapes_literals() {
        assert_eq!(like_pattern(&LikePattern::parse("jo*")), "jo%");
        assert_eq!(like_pattern(&LikePattern::parse("a?c")), "a_c");
        assert_eq!(like_pattern(&LikePattern::parse("50%_off")), "50\\%\\_off");
    }

    #[test]
    fn single_bound_stays_bare() {
        let p = Predicate::compare("age", CompareOp::Gt, Value::I64(1));
        let expr = SqlEmitter.emit(&p).unwrap();
        assert!(matches!(
            expr,
            SimpleExpr::Binary(_, BinOper::GreaterThan, _)
        ));
    }

    #[test]
    fn both_bounds_are_anded() {
        let p = Predicate::all(vec![
            Predicate::compare("age", CompareOp::Ge, Value::I64(1)),
            Predicate::compare("age", CompareOp::Le, Value::I64(2)),
        ]);
        let expr = SqlEmitter.emit(&p).unwrap();
        assert!(matches!(expr, SimpleExpr::Binary(_, BinOper::And, _)));
        let sql = render(expr);
        assert!(sql.contains(r#""age" >= 1"#), "{sql}");
        assert!(sql.contains(r#""age" <= 2"#), "{sql}");
    }

    #[test]
    fn not_like_renders_negated_with_escape() {
        let p = Predicate::not_like("name", LikePattern::parse("jo*"));
        let sql = render(SqlEmitter.emit(&p).unwrap());
        assert!(sql.contains(r#""name" NOT LIKE 'jo%'"#), "{sql}");
        assert!(sql.contains("ESCAPE"), "{sql}");
    }

    #[test]
    fn decimal_keeps_scale() {
        let v = Value::parse(FieldKind::Decimal, "12.50").unwrap();
        let sea = to_sea_value(&v).unwrap();
        assert_eq!(sea, sea_orm::Value::Decimal(Some(Box::new(Decimal::new(125, 1)))));
    }
}

use bigdecimal::ToPrimitive;
use pagekit_query::{CompareOp, LikePattern, LikeToken, Value};
use serde_json::{Map, Number, json};

use crate::{DbError, DbResult, PredicateEmitter};

/// Renders predicates as operator documents.
///
/// `field >= 1` becomes `{"field": {"$gte": 1}}`; conjunctions become
/// `{"$and": [...]}`; like patterns become an anchored `$regex`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentEmitter;

impl PredicateEmitter for DocumentEmitter {
    type Output = serde_json::Value;

    fn compare(&self, field: &str, op: CompareOp, value: &Value) -> DbResult<serde_json::Value> {
        let v = to_json(value)?;
        let cond = match op {
            CompareOp::Eq => v,
            CompareOp::Gt => json!({ "$gt": v }),
            CompareOp::Ge => json!({ "$gte": v }),
            CompareOp::Lt => json!({ "$lt": v }),
            CompareOp::Le => json!({ "$lte": v }),
        };
        Ok(single(field, cond))
    }

    fn like(
        &self,
        field: &str,
        pattern: &LikePattern,
        negated: bool,
    ) -> DbResult<serde_json::Value> {
        let regex = json!({ "$regex": regex_pattern(pattern) });
        let cond = if negated {
            json!({ "$not": regex })
        } else {
            regex
        };
        Ok(single(field, cond))
    }

    fn and(&self, parts: Vec<serde_json::Value>) -> serde_json::Value {
        json!({ "$and": parts })
    }
}

fn single(field: &str, cond: serde_json::Value) -> serde_json::Value {
    let mut doc = Map::new();
    doc.insert(field.to_owned(), cond);
    serde_json::Value::Object(doc)
}

/// Anchored regular expression equivalent of a wildcard term.
#[must_use]
pub fn regex_pattern(pattern: &LikePattern) -> String {
    let mut out = String::from("^");
    for token in pattern.tokens() {
        match token {
            LikeToken::Literal(text) => out.push_str(&regex::escape(text)),
            LikeToken::AnyChars => out.push_str(".*"),
            LikeToken::AnyChar => out.push('.'),
        }
    }
    out.push('$');
    out
}

/// JSON form of a typed literal. Temporal values and UUIDs become strings.
///
/// # Errors
/// Returns [`DbError::InvalidDecimal`] when a decimal has no finite `f64` form.
pub fn to_json(value: &Value) -> DbResult<serde_json::Value> {
    Ok(match value {
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::I64(i) => serde_json::Value::from(*i),
        Value::F64(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or_else(|| DbError::InvalidDecimal(f.to_string()))?,
        Value::Decimal(d) => d
            .to_f64()
            .and_then(Number::from_f64)
            .map(serde_json::Value::Number)
            .ok_or_else(|| DbError::InvalidDecimal(d.to_string()))?,
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Uuid(u) => serde_json::Value::String(u.to_string()),
        Value::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
        Value::Date(d) => serde_json::Value::String(d.to_string()),
        Value::Time(t) => serde_json::Value::String(t.to_string()),
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn regex_escapes_literals_and_anchors() {
        assert_eq!(regex_pattern(&LikePattern::parse("a.b*")), r"^a\.b.*$");
        assert_eq!(regex_pattern(&LikePattern::parse("?x")), "^.x$");
    }

    #[test]
    fn negated_like_wraps_regex_in_not() {
        let doc = DocumentEmitter
            .like("name", &LikePattern::parse("jo*"), true)
            .unwrap();
        assert_eq!(doc, json!({ "name": { "$not": { "$regex": "^jo.*$" } } }));
    }

    #[test]
    fn equality_is_a_plain_field_value() {
        let doc = DocumentEmitter
            .compare("active", CompareOp::Eq, &Value::Bool(true))
            .unwrap();
        assert_eq!(doc, json!({ "active": true }));
    }
}

//! `like` / `notlike` expressions: `like*smith`, `notlikejo?n*`.
//!
//! The operand is the search term, e.g. `*smith` for `like*smith`.

use super::FilterExpressionConverter;
use crate::{FieldKind, FilterError, FilterResult, LikePattern, Predicate};

fn pattern(converter: &'static str, operand: &str) -> FilterResult<LikePattern> {
    if operand.is_empty() {
        return Err(FilterError::NotAnExpression {
            converter,
            value: operand.to_owned(),
        });
    }
    Ok(LikePattern::parse(operand))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LikeConverter;

impl LikeConverter {
    pub const NAME: &'static str = "like";
    pub const PATTERN: &'static str = r"^like(.+)$";
}

impl FilterExpressionConverter for LikeConverter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn convert(&self, field: &str, operand: &str, _kind: FieldKind) -> FilterResult<Predicate> {
        Ok(Predicate::like(field, pattern(Self::NAME, operand)?))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NotLikeConverter;

impl NotLikeConverter {
    pub const NAME: &'static str = "notlike";
    pub const PATTERN: &'static str = r"^notlike(.+)$";
}

impl FilterExpressionConverter for NotLikeConverter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn convert(&self, field: &str, operand: &str, _kind: FieldKind) -> FilterResult<Predicate> {
        Ok(Predicate::not_like(field, pattern(Self::NAME, operand)?))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_like_keeps_term_as_pattern() {
        let p = LikeConverter
            .convert("name", "*smith", FieldKind::String)
            .unwrap();
        assert_eq!(p, Predicate::like("name", LikePattern::parse("*smith")));
    }

    #[test]
    fn test_notlike_is_negated() {
        let p = NotLikeConverter
            .convert("name", "admin*", FieldKind::String)
            .unwrap();
        assert!(matches!(p, Predicate::Like { negated: true, .. }));
    }

    #[test]
    fn test_term_is_taken_verbatim() {
        let p = LikeConverter
            .convert("name", "like*", FieldKind::String)
            .unwrap();
        assert_eq!(p, Predicate::like("name", LikePattern::parse("like*")));
    }

    #[test]
    fn test_empty_term_is_rejected() {
        assert!(LikeConverter.convert("name", "", FieldKind::String).is_err());
        assert!(NotLikeConverter.convert("name", "", FieldKind::String).is_err());
    }
}

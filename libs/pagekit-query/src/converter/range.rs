//! `range` expressions: `range[1,10]`, `range]1,10[`, `range[2020-01-01,[`.
//!
//! `[` as opening bracket includes the lower bound, `]` excludes it; `]` as
//! closing bracket includes the upper bound, `[` excludes it. One side may be
//! empty for an open-ended range, but not both.
//!
//! The converter's operand is the bracketed part, e.g. `[1,10]`.

use std::sync::LazyLock;

use regex::Regex;

use super::FilterExpressionConverter;
use crate::{CompareOp, Driver, FieldKind, FilterError, FilterResult, Predicate, Value};

const PREFIX: &str = "range";

static BODY: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^([\[\]])([^,]*),([^,]*)([\[\]])$").unwrap()
});

/// Parsed range with cast bounds. An absent bound leaves that side unconstrained.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeExpression {
    pub lower: Option<Value>,
    pub lower_inclusive: bool,
    pub upper: Option<Value>,
    pub upper_inclusive: bool,
}

struct RawRange<'a> {
    lower: Option<&'a str>,
    lower_inclusive: bool,
    upper: Option<&'a str>,
    upper_inclusive: bool,
}

fn split(raw: &str) -> Option<RawRange<'_>> {
    split_bounds(raw.strip_prefix(PREFIX)?)
}

fn split_bounds(operand: &str) -> Option<RawRange<'_>> {
    let caps = BODY.captures(operand)?;

    let bound = |i: usize| {
        caps.get(i)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
    };
    let lower = bound(2);
    let upper = bound(3);
    if lower.is_none() && upper.is_none() {
        return None;
    }

    Some(RawRange {
        lower,
        lower_inclusive: &caps[1] == "[",
        upper,
        upper_inclusive: &caps[4] == "]",
    })
}

impl RangeExpression {
    /// Parse `raw` and cast its bounds to `kind`.
    ///
    /// Returns `Ok(None)` when `raw` is not a range expression, including the
    /// fully unbounded `range[,]`.
    ///
    /// # Errors
    /// Returns `FilterError::Conversion` when a bound cannot be cast to `kind`.
    pub fn parse(raw: &str, kind: FieldKind) -> FilterResult<Option<Self>> {
        split(raw).map_or(Ok(None), |parts| Self::cast(&parts, kind))
    }

    /// Same as [`RangeExpression::parse`] for the bracketed part alone, `[1,10[`.
    ///
    /// # Errors
    /// Returns `FilterError::Conversion` when a bound cannot be cast to `kind`.
    pub fn parse_bounds(operand: &str, kind: FieldKind) -> FilterResult<Option<Self>> {
        split_bounds(operand).map_or(Ok(None), |parts| Self::cast(&parts, kind))
    }

    fn cast(parts: &RawRange<'_>, kind: FieldKind) -> FilterResult<Option<Self>> {
        let lower = parts.lower.map(|s| Value::parse(kind, s)).transpose()?;
        let upper = parts.upper.map(|s| Value::parse(kind, s)).transpose()?;

        Ok(Some(Self {
            lower,
            lower_inclusive: parts.lower_inclusive,
            upper,
            upper_inclusive: parts.upper_inclusive,
        }))
    }

    /// Comparison predicates for `field`: both bounds are AND-ed, a single
    /// bound is returned bare.
    #[must_use]
    pub fn to_predicate(&self, field: &str) -> Predicate {
        let mut parts = Vec::with_capacity(2);

        if let Some(lower) = &self.lower {
            let op = if self.lower_inclusive {
                CompareOp::Ge
            } else {
                CompareOp::Gt
            };
            parts.push(Predicate::compare(field, op, lower.clone()));
        }
        if let Some(upper) = &self.upper {
            let op = if self.upper_inclusive {
                CompareOp::Le
            } else {
                CompareOp::Lt
            };
            parts.push(Predicate::compare(field, op, upper.clone()));
        }

        Predicate::all(parts)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RangeConverter;

impl RangeConverter {
    pub const NAME: &'static str = "range";
    pub const PATTERN: &'static str = r"^range([\[\]][^,]*,[^,]*[\[\]])$";
}

impl FilterExpressionConverter for RangeConverter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn supports(&self, _driver: Driver, operand: &str) -> bool {
        split_bounds(operand).is_some()
    }

    fn convert(&self, field: &str, operand: &str, kind: FieldKind) -> FilterResult<Predicate> {
        RangeExpression::parse_bounds(operand, kind)?
            .map(|range| range.to_predicate(field))
            .ok_or_else(|| FilterError::NotAnExpression {
                converter: Self::NAME,
                value: operand.to_owned(),
            })
    }
}

//! Filter expression converters.
//!
//! A converter turns one raw criteria value into a [`Predicate`]. Converters are
//! stateless and backend-neutral; the registry decides which drivers may use them.

use std::fmt;

use crate::{Driver, FieldKind, FilterResult, Predicate};

pub mod like;
pub mod range;

pub use like::{LikeConverter, NotLikeConverter};
pub use range::RangeConverter;

/// Converts the operand of a filter expression.
///
/// The registry hands over the operand, not the raw value: the text captured
/// by the first group of the registration pattern, or the whole raw value when
/// the pattern has no group. The built-in patterns capture everything after
/// their `like`, `notlike` or `range` prefix.
pub trait FilterExpressionConverter: Send + Sync + fmt::Debug {
    /// Short identifier, used in configuration and logs.
    fn name(&self) -> &'static str;

    /// Structural check run after the registration pattern matched.
    ///
    /// The registration pattern is the primary gate, so the default accepts
    /// everything.
    fn supports(&self, driver: Driver, operand: &str) -> bool {
        let _ = (driver, operand);
        true
    }

    /// Build the predicate for `field` from `operand`, casting it to `kind`.
    ///
    /// # Errors
    /// Returns `FilterError::Conversion` when an operand cannot be cast to `kind`
    /// and `FilterError::NotAnExpression` when `operand` is not this converter's syntax.
    fn convert(&self, field: &str, operand: &str, kind: FieldKind) -> FilterResult<Predicate>;
}

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Backend-neutral vocabulary for list endpoints.
//!
//! Raw filter values arrive as strings (`"active"`, `"range[1,10["`, `"like*smith"`).
//! The [`ConverterRegistry`] decides, per backend [`Driver`], whether a raw value is a
//! filter expression and which [`FilterExpressionConverter`] turns it into a [`Predicate`].
//! Values that match no registration are plain equality operands.
//!
//! Nothing in this crate talks to a store: emitting backend syntax is the job of
//! `pagekit-db`.

pub mod converter;
pub mod driver;
pub mod error;
pub mod kind;
pub mod order;
pub mod predicate;
pub mod registry;
pub mod value;

pub use converter::{FilterExpressionConverter, LikeConverter, NotLikeConverter, RangeConverter};
pub use converter::range::RangeExpression;
pub use driver::Driver;
pub use error::{FilterError, FilterResult};
pub use kind::FieldKind;
pub use order::{Criteria, OrderBy, OrderKey, SortDir};
pub use predicate::{CompareOp, LikePattern, LikeToken, Predicate};
pub use registry::{ConverterRegistration, ConverterRegistry, Resolved};
pub use value::Value;

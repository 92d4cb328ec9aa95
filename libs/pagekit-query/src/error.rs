use thiserror::Error;

use crate::FieldKind;

#[derive(Debug, Error, Clone)]
pub enum FilterError {
    /// A raw operand could not be cast to the declared field kind.
    #[error("cannot convert \"{value}\" to {kind}")]
    Conversion { kind: FieldKind, value: String },

    /// A converter was asked to convert a value it does not recognize.
    #[error("\"{value}\" is not a {converter} expression")]
    NotAnExpression {
        converter: &'static str,
        value: String,
    },

    #[error("invalid converter pattern \"{pattern}\": {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("converter registration for \"{pattern}\" has no driver")]
    NoDriver { pattern: String },
}

pub type FilterResult<T> = Result<T, FilterError>;

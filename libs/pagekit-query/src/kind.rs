//! Logical field types used to cast raw filter strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical type of a filterable field.
///
/// Criteria values are plain strings; the declared kind decides how an
/// equality operand or a range bound is cast before it reaches a backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    String,
    #[serde(alias = "int", alias = "integer")]
    I64,
    #[serde(alias = "float", alias = "double")]
    F64,
    #[serde(alias = "boolean")]
    Bool,
    Uuid,
    #[serde(alias = "datetime")]
    DateTimeUtc,
    Date,
    Time,
    Decimal,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "String"),
            FieldKind::I64 => write!(f, "I64"),
            FieldKind::F64 => write!(f, "F64"),
            FieldKind::Bool => write!(f, "Bool"),
            FieldKind::Uuid => write!(f, "Uuid"),
            FieldKind::DateTimeUtc => write!(f, "DateTimeUtc"),
            FieldKind::Date => write!(f, "Date"),
            FieldKind::Time => write!(f, "Time"),
            FieldKind::Decimal => write!(f, "Decimal"),
        }
    }
}

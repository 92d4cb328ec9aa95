//! Typed operands produced by casting raw filter strings.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::{FieldKind, FilterError, FilterResult};

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    I64(i64),
    F64(f64),
    Decimal(BigDecimal),
    String(String),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl Value {
    /// Cast a raw operand to `kind`.
    ///
    /// Surrounding whitespace is ignored for every kind except `String`.
    ///
    /// # Errors
    /// Returns `FilterError::Conversion` when `raw` is not a valid literal of `kind`.
    pub fn parse(kind: FieldKind, raw: &str) -> FilterResult<Self> {
        let fail = || FilterError::Conversion {
            kind,
            value: raw.to_owned(),
        };
        let s = raw.trim();

        Ok(match kind {
            FieldKind::String => Value::String(raw.to_owned()),
            FieldKind::I64 => Value::I64(s.parse::<i64>().map_err(|_| fail())?),
            FieldKind::F64 => {
                let f = s.parse::<f64>().map_err(|_| fail())?;
                if !f.is_finite() {
                    return Err(fail());
                }
                Value::F64(f)
            }
            FieldKind::Decimal => Value::Decimal(BigDecimal::from_str(s).map_err(|_| fail())?),
            FieldKind::Bool => match s.to_ascii_lowercase().as_str() {
                "true" | "1" => Value::Bool(true),
                "false" | "0" => Value::Bool(false),
                _ => return Err(fail()),
            },
            FieldKind::Uuid => Value::Uuid(s.parse::<Uuid>().map_err(|_| fail())?),
            FieldKind::DateTimeUtc => Value::DateTime(
                DateTime::parse_from_rfc3339(s)
                    .map_err(|_| fail())?
                    .with_timezone(&Utc),
            ),
            FieldKind::Date => Value::Date(s.parse::<NaiveDate>().map_err(|_| fail())?),
            FieldKind::Time => Value::Time(s.parse::<NaiveTime>().map_err(|_| fail())?),
        })
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Value::Bool(_) => FieldKind::Bool,
            Value::I64(_) => FieldKind::I64,
            Value::F64(_) => FieldKind::F64,
            Value::Decimal(_) => FieldKind::Decimal,
            Value::String(_) => FieldKind::String,
            Value::Uuid(_) => FieldKind::Uuid,
            Value::DateTime(_) => FieldKind::DateTimeUtc,
            Value::Date(_) => FieldKind::Date,
            Value::Time(_) => FieldKind::Time,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::I64(i) => write!(f, "{i}"),
            Value::F64(x) => write!(f, "{x}"),
            Value::Decimal(d) => write!(f, "{}", d.normalized()),
            Value::String(s) => write!(f, "{s}"),
            Value::Uuid(u) => write!(f, "{u}"),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::Date(d) => write!(f, "{d}"),
            Value::Time(t) => write!(f, "{t}"),
        }
    }
}

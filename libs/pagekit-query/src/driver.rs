use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of backing store a query is built for.
///
/// Configuration accepts both the neutral names and the historical driver
/// identifiers (`orm`, `mongodb`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    /// SQL store; predicates become boolean expression trees.
    #[default]
    #[serde(alias = "orm")]
    Relational,
    /// Document store; predicates become nested operator documents.
    #[serde(alias = "mongodb")]
    Document,
}

impl Driver {
    pub const ALL: &'static [Driver] = &[Driver::Relational, Driver::Document];
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Driver::Relational => write!(f, "relational"),
            Driver::Document => write!(f, "document"),
        }
    }
}

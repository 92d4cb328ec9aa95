//! Ordered criteria and sort maps.
//!
//! Both keep insertion order: sort keys apply in the order given, and a key
//! inserted twice keeps its first position with the latest value.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, Deserialize)]
pub enum SortDir {
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDir::Asc => write!(f, "ASC"),
            SortDir::Desc => write!(f, "DESC"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderKey {
    pub field: String,
    pub dir: SortDir,
}

/// Field -> direction map that remembers insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct OrderBy(pub Vec<OrderKey>);

impl OrderBy {
    pub fn empty() -> Self {
        Self(vec![])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderKey> {
        self.0.iter()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<SortDir> {
        self.0.iter().find(|k| k.field == field).map(|k| k.dir)
    }

    /// Set the direction of `field`, appending it when absent.
    pub fn insert(&mut self, field: impl Into<String>, dir: SortDir) {
        let field = field.into();
        if let Some(key) = self.0.iter_mut().find(|k| k.field == field) {
            key.dir = dir;
        } else {
            self.0.push(OrderKey { field, dir });
        }
    }

    /// Builder form of [`OrderBy::insert`].
    pub fn with(mut self, field: impl Into<String>, dir: SortDir) -> Self {
        self.insert(field, dir);
        self
    }

    /// Merge `other` into `self`: existing fields take the new direction in
    /// place, new fields are appended in `other`'s order.
    pub fn merge(mut self, other: OrderBy) -> Self {
        for key in other.0 {
            self.insert(key.field, key.dir);
        }
        self
    }
}

impl<K: Into<String>> FromIterator<(K, SortDir)> for OrderBy {
    fn from_iter<I: IntoIterator<Item = (K, SortDir)>>(iter: I) -> Self {
        let mut out = OrderBy::empty();
        for (field, dir) in iter {
            out.insert(field, dir);
        }
        out
    }
}

impl Serialize for OrderBy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for key in &self.0 {
            map.serialize_entry(&key.field, &key.dir)?;
        }
        map.end()
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(none)");
        }

        let formatted: Vec<String> = self
            .0
            .iter()
            .map(|key| format!("{} {}", key.field, key.dir))
            .collect();

        write!(f, "{}", formatted.join(", "))
    }
}

/// Field -> raw filter value map that remembers insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct Criteria(Vec<(String, String)>);

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn insert(&mut self, field: impl Into<String>, raw: impl Into<String>) {
        let field = field.into();
        let raw = raw.into();
        if let Some(entry) = self.0.iter_mut().find(|(f, _)| *f == field) {
            entry.1 = raw;
        } else {
            self.0.push((field, raw));
        }
    }

    pub fn with(mut self, field: impl Into<String>, raw: impl Into<String>) -> Self {
        self.insert(field, raw);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(f, v)| (f.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Criteria {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = Criteria::new();
        for (field, raw) in iter {
            out.insert(field, raw);
        }
        out
    }
}

impl Serialize for Criteria {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, raw) in &self.0 {
            map.serialize_entry(field, raw)?;
        }
        map.end()
    }
}

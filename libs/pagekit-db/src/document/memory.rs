//! In-memory document store.
//!
//! Evaluates the operator subset produced by [`DocumentEmitter`](super::DocumentEmitter):
//! `$and`, `$eq`, `$ne`, `$gt`, `$gte`, `$lt`, `$lte`, `$regex`, `$not`
//! and plain field equality. Field names may use dots to reach nested values.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use pagekit_query::SortDir;
use parking_lot::RwLock;
use regex::Regex;
use sea_orm::JsonValue;

use super::{DocumentQuery, DocumentStore};
use crate::{DbError, DbResult};

/// Collections of JSON documents held in memory.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<JsonValue>>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, collection: &str, document: JsonValue) {
        self.collections
            .write()
            .entry(collection.to_owned())
            .or_default()
            .push(document);
    }

    pub fn insert_many(&self, collection: &str, documents: impl IntoIterator<Item = JsonValue>) {
        self.collections
            .write()
            .entry(collection.to_owned())
            .or_default()
            .extend(documents);
    }

    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.collections.read().get(collection).map_or(0, Vec::len)
    }

    fn matching(&self, query: &DocumentQuery) -> DbResult<Vec<JsonValue>> {
        let matcher = Matcher::compile(&query.filter())?;
        let guard = self.collections.read();
        Ok(guard
            .get(query.collection())
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matcher.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn count(&self, query: &DocumentQuery) -> DbResult<u64> {
        let n = self.matching(query)?.len();
        Ok(u64::try_from(n).unwrap_or(u64::MAX))
    }

    async fn find(&self, query: &DocumentQuery) -> DbResult<Vec<JsonValue>> {
        let mut docs = self.matching(query)?;

        if !query.order().is_empty() {
            docs.sort_by(|a, b| {
                for key in query.order().iter() {
                    let ord = compare_missing_first(lookup(a, &key.field), lookup(b, &key.field));
                    let ord = match key.dir {
                        SortDir::Asc => ord,
                        SortDir::Desc => ord.reverse(),
                    };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            });
        }

        let skip = query
            .offset()
            .map_or(0, |s| usize::try_from(s).unwrap_or(usize::MAX));
        let take = query
            .max_results()
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        Ok(docs.into_iter().skip(skip).take(take).collect())
    }
}

enum Matcher {
    All(Vec<Matcher>),
    Field { path: String, cond: Cond },
}

enum Cond {
    Eq(JsonValue),
    Cmp(Ordering, bool, JsonValue),
    Regex(Regex),
    Not(Box<Cond>),
    All(Vec<Cond>),
}

impl Matcher {
    fn compile(filter: &JsonValue) -> DbResult<Self> {
        let obj = filter
            .as_object()
            .ok_or_else(|| DbError::InvalidDocumentFilter(filter.to_string()))?;

        let mut parts = Vec::with_capacity(obj.len());
        for (key, value) in obj {
            if key == "$and" {
                let items = value
                    .as_array()
                    .ok_or_else(|| DbError::InvalidDocumentFilter(value.to_string()))?;
                parts.push(Matcher::All(
                    items.iter().map(Matcher::compile).collect::<DbResult<_>>()?,
                ));
            } else if key.starts_with('$') {
                return Err(DbError::InvalidDocumentFilter(key.clone()));
            } else {
                parts.push(Matcher::Field {
                    path: key.clone(),
                    cond: Cond::compile(value)?,
                });
            }
        }
        Ok(Matcher::All(parts))
    }

    fn matches(&self, doc: &JsonValue) -> bool {
        match self {
            Matcher::All(parts) => parts.iter().all(|m| m.matches(doc)),
            Matcher::Field { path, cond } => cond.matches(lookup(doc, path)),
        }
    }
}

impl Cond {
    fn compile(value: &JsonValue) -> DbResult<Self> {
        let Some(ops) = value
            .as_object()
            .filter(|o| !o.is_empty() && o.keys().all(|k| k.starts_with('$')))
        else {
            return Ok(Cond::Eq(value.clone()));
        };

        let mut conds = Vec::with_capacity(ops.len());
        for (op, arg) in ops {
            let cond = match op.as_str() {
                "$eq" => Cond::Eq(arg.clone()),
                "$ne" => Cond::Not(Box::new(Cond::Eq(arg.clone()))),
                "$gt" => Cond::Cmp(Ordering::Greater, false, arg.clone()),
                "$gte" => Cond::Cmp(Ordering::Greater, true, arg.clone()),
                "$lt" => Cond::Cmp(Ordering::Less, false, arg.clone()),
                "$lte" => Cond::Cmp(Ordering::Less, true, arg.clone()),
                "$regex" => {
                    let pattern = arg
                        .as_str()
                        .ok_or_else(|| DbError::InvalidDocumentFilter(arg.to_string()))?;
                    let re = Regex::new(pattern)
                        .map_err(|e| DbError::InvalidDocumentFilter(e.to_string()))?;
                    Cond::Regex(re)
                }
                "$not" => Cond::Not(Box::new(Cond::compile(arg)?)),
                other => return Err(DbError::InvalidDocumentFilter(other.to_owned())),
            };
            conds.push(cond);
        }
        Ok(Cond::All(conds))
    }

    fn matches(&self, actual: Option<&JsonValue>) -> bool {
        match self {
            Cond::Eq(expected) => match actual {
                Some(v) => json_eq(v, expected),
                None => expected.is_null(),
            },
            Cond::Cmp(wanted, or_equal, bound) => actual
                .and_then(|v| compare(v, bound))
                .is_some_and(|ord| ord == *wanted || (*or_equal && ord == Ordering::Equal)),
            Cond::Regex(re) => actual
                .and_then(JsonValue::as_str)
                .is_some_and(|s| re.is_match(s)),
            Cond::Not(inner) => !inner.matches(actual),
            Cond::All(conds) => conds.iter().all(|c| c.matches(actual)),
        }
    }
}

fn lookup<'a>(doc: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    path.split('.').try_fold(doc, |cur, part| cur.get(part))
}

fn json_eq(a: &JsonValue, b: &JsonValue) -> bool {
    match (a, b) {
        (JsonValue::Number(_), JsonValue::Number(_)) => compare(a, b) == Some(Ordering::Equal),
        _ => a == b,
    }
}

/// Ordering between two scalars of the same JSON type.
fn compare(a: &JsonValue, b: &JsonValue) -> Option<Ordering> {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (JsonValue::String(x), JsonValue::String(y)) => Some(x.cmp(y)),
        (JsonValue::Bool(x), JsonValue::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn compare_missing_first(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
    }
}

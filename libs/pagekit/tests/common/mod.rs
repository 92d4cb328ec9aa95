#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pagekit_db::{DbResult, DocumentQuery, DocumentStore, MemoryDocumentStore};
use serde_json::{Value, json};

/// Document store that counts the calls it serves.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryDocumentStore,
    pub counts: AtomicUsize,
    pub finds: AtomicUsize,
}

impl CountingStore {
    pub fn with_people(n: usize) -> Arc<Self> {
        let store = Self::default();
        store.inner.insert_many(
            "people",
            (1..=n).map(|i| json!({ "id": i, "name": format!("person{i:02}"), "age": 18 + i % 50 })),
        );
        Arc::new(store)
    }

    pub fn calls(&self) -> (usize, usize) {
        (
            self.counts.load(Ordering::SeqCst),
            self.finds.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn count(&self, query: &DocumentQuery) -> DbResult<u64> {
        self.counts.fetch_add(1, Ordering::SeqCst);
        self.inner.count(query).await
    }

    async fn find(&self, query: &DocumentQuery) -> DbResult<Vec<Value>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find(query).await
    }
}

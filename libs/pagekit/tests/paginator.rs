#![allow(clippy::unwrap_used, clippy::expect_used, clippy::use_debug)]

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use common::CountingStore;
use figment::Figment;
use figment::providers::Serialized;
use pagekit::{
    CountItems, Criteria, Driver, Fetched, HydrationMode, OrderBy, PaginationConfig,
    PaginationError, PaginationManager, PaginationRequest, Paginator, SelectItems, SelectRequest,
    SortDir, StoreHandle, StoreQuery,
};
use pagekit_db::{DocumentQuery, QueryBuilder};
use serde::Deserialize;
use serde_json::{Value, json};

fn paginator(store: &Arc<CountingStore>) -> Paginator {
    let figment = Figment::new().merge(Serialized::defaults(json!({
        "pagination": {
            "db_driver": "document",
            "template": "pagination/default.html",
            "request": { "sort": { "attributes_availables": ["name", "age"] } },
            "pagination_managers": {
                "people": { "item_per_page": 10, "max_page_number": 4, "fields": { "id": "int", "age": "int" } }
            }
        }
    })));
    let handle = StoreHandle::Document(store.clone());
    let manager = PaginationManager::builder(PaginationConfig::from_figment(&figment).unwrap())
        .store("default", handle)
        .build()
        .unwrap();
    Paginator::new(Arc::new(manager))
}

fn object(fetched: Fetched) -> pagekit::PaginationResultSet {
    fetched.into_object().expect("object hydration")
}

fn ids(items: &[Value]) -> Vec<i64> {
    items.iter().map(|d| d["id"].as_i64().unwrap()).collect()
}

#[tokio::test]
async fn paginates_with_ceiling_page_count_and_offset() {
    let store = CountingStore::with_people(25);
    let mut p = paginator(&store);
    let req = PaginationRequest::from_query_str("page=3&sort=age&desc=").unwrap();

    let rs = object(
        p.paginate("people", &req, Criteria::new(), OrderBy::empty(), true, HydrationMode::Object)
            .await
            .unwrap(),
    );
    assert_eq!(rs.page, 3);
    assert_eq!(rs.items_per_page, 10);
    assert_eq!(rs.item_offset, 20);
    assert_eq!(rs.total_items, 25);
    assert_eq!(rs.total_pages, 3);
    assert_eq!(rs.items.len(), 5);
    assert_eq!(rs.order_by, OrderBy::empty().with("age", SortDir::Asc));
}

#[tokio::test]
async fn exact_multiple_and_one_more_item() {
    for (n, pages) in [(10, 1), (11, 2)] {
        let store = CountingStore::with_people(n);
        let mut p = paginator(&store);
        let rs = object(
            p.paginate(
                "people",
                &PaginationRequest::new(),
                Criteria::new(),
                OrderBy::empty(),
                true,
                HydrationMode::Object,
            )
            .await
            .unwrap(),
        );
        assert_eq!(rs.total_pages, pages, "{n} items");
    }
}

#[tokio::test]
async fn page_past_ceiling_is_clamped() {
    let store = CountingStore::with_people(100);
    let mut p = paginator(&store);
    let req = PaginationRequest::new().with_query("page", "1000");
    let rs = object(
        p.paginate("people", &req, Criteria::new(), OrderBy::empty(), true, HydrationMode::Object)
            .await
            .unwrap(),
    );
    assert_eq!(rs.page, 4);
    assert_eq!(rs.item_offset, 30);
    assert_eq!(rs.total_pages, 10);
}

#[tokio::test]
async fn zero_items_skip_the_select_step() {
    let store = CountingStore::with_people(5);
    let mut p = paginator(&store);
    let rs = object(
        p.paginate(
            "people",
            &PaginationRequest::new(),
            Criteria::new().with("age", "range[100,]"),
            OrderBy::empty(),
            true,
            HydrationMode::Object,
        )
        .await
        .unwrap(),
    );
    assert_eq!(rs.total_items, 0);
    assert_eq!(rs.total_pages, 0);
    assert!(rs.items.is_empty());
    assert_eq!(store.calls(), (1, 0));
}

#[tokio::test]
async fn fetch_requires_prepare_and_touches_no_backend() {
    let store = CountingStore::with_people(5);
    let mut p = paginator(&store);

    let err = p.fetch(HydrationMode::Object).await.unwrap_err();
    assert!(matches!(err, PaginationError::NotPrepared));
    assert_eq!(store.calls(), (0, 0));

    p.prepare("people", &PaginationRequest::new(), Criteria::new(), OrderBy::empty(), true)
        .unwrap();
    p.fetch(HydrationMode::Object).await.unwrap();
    assert!(!p.is_prepared());

    let err = p.fetch(HydrationMode::Object).await.unwrap_err();
    assert!(matches!(err, PaginationError::NotPrepared));
    assert_eq!(store.calls(), (1, 1));
}

#[tokio::test]
async fn second_prepare_replaces_the_first() {
    let store = CountingStore::with_people(30);
    let mut p = paginator(&store);
    let req = PaginationRequest::new();

    p.prepare("people", &req, Criteria::new().with("id", "3"), OrderBy::empty(), true)
        .unwrap();
    p.prepare("people", &req, Criteria::new().with("id", "range]20,23]"), OrderBy::empty(), true)
        .unwrap();
    let rs = object(p.fetch(HydrationMode::Object).await.unwrap());
    assert_eq!(rs.total_items, 3);
    assert_eq!(ids(&rs.items), [21, 22, 23]);
}

#[tokio::test]
async fn page_selection_is_kept_between_cycles() {
    let store = CountingStore::with_people(30);
    let mut p = paginator(&store);

    let req = PaginationRequest::new().with_query("page", "2");
    p.prepare("people", &req, Criteria::new(), OrderBy::empty(), true)
        .unwrap();
    p.fetch(HydrationMode::Object).await.unwrap();
    assert_eq!(p.page(), 2);

    p.prepare("people", &PaginationRequest::new(), Criteria::new(), OrderBy::empty(), true)
        .unwrap();
    let rs = object(p.fetch(HydrationMode::Object).await.unwrap());
    assert_eq!(rs.page, 2);
    assert_eq!(rs.item_offset, 10);
}

#[tokio::test]
async fn non_strict_sort_keeps_valid_attributes_in_request_order() {
    let store = CountingStore::with_people(12);
    let mut p = paginator(&store);
    let req = PaginationRequest::from_query_str("sort=secret,name&desc=name").unwrap();

    let err = p
        .prepare("people", &req, Criteria::new(), OrderBy::empty(), true)
        .unwrap_err();
    assert!(matches!(err, PaginationError::SortAttributeNotAvailable(_)));

    let rs = object(
        p.paginate("people", &req, Criteria::new(), OrderBy::empty(), false, HydrationMode::Object)
            .await
            .unwrap(),
    );
    assert_eq!(rs.order_by, OrderBy::empty().with("name", SortDir::Desc));
    assert_eq!(ids(&rs.items)[0], 12);
}

struct FixedCount(Value);

#[async_trait]
impl CountItems for FixedCount {
    async fn count_items(&self, _: &StoreHandle, _: &Criteria) -> anyhow::Result<Value> {
        Ok(self.0.clone())
    }
}

#[derive(Default)]
struct RecordingSelect {
    calls: AtomicUsize,
    window: std::sync::Mutex<Option<(u64, u64)>>,
}

#[async_trait]
impl SelectItems for RecordingSelect {
    async fn select_items(&self, _: &StoreHandle, request: SelectRequest<'_>) -> anyhow::Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.window.lock().unwrap() = Some((request.limit, request.offset));
        Ok(json!([{ "id": 99 }]))
    }
}

struct ObjectSelect;

#[async_trait]
impl SelectItems for ObjectSelect {
    async fn select_items(&self, _: &StoreHandle, _: SelectRequest<'_>) -> anyhow::Result<Value> {
        Ok(json!({ "id": 1 }))
    }
}

struct FailingCount;

#[async_trait]
impl CountItems for FailingCount {
    async fn count_items(&self, _: &StoreHandle, _: &Criteria) -> anyhow::Result<Value> {
        anyhow::bail!("count service unavailable")
    }
}

#[tokio::test]
async fn callables_take_priority_and_are_cleared_after_fetch() {
    let store = CountingStore::with_people(5);
    let mut p = paginator(&store);
    let select = Arc::new(RecordingSelect::default());

    let req = PaginationRequest::new().with_query("page", "3");
    p.prepare("people", &req, Criteria::new(), OrderBy::empty(), true)
        .unwrap();
    p.set_count_query(StoreQuery::Document(DocumentQuery::new("nobody")))
        .set_count_items(Arc::new(FixedCount(json!(42))))
        .set_select_items(select.clone());
    let rs = object(p.fetch(HydrationMode::Object).await.unwrap());

    assert_eq!(rs.total_items, 42);
    assert_eq!(rs.total_pages, 5);
    assert_eq!(ids(&rs.items), [99]);
    assert_eq!(*select.window.lock().unwrap(), Some((10, 20)));
    assert_eq!(store.calls(), (0, 0));

    p.prepare("people", &PaginationRequest::new(), Criteria::new(), OrderBy::empty(), true)
        .unwrap();
    let rs = object(p.fetch(HydrationMode::Object).await.unwrap());
    assert_eq!(rs.total_items, 5);
    assert_eq!(select.calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.calls(), (1, 1));
}

#[tokio::test]
async fn injected_queries_beat_internal_ones_and_get_the_window() {
    let store = CountingStore::with_people(30);
    let mut p = paginator(&store);

    let mut only_even = DocumentQuery::new("people");
    only_even
        .filter_equals("age", &pagekit_query::Value::I64(20))
        .unwrap();
    let mut select = only_even.clone();
    select.sort("id", SortDir::Desc);

    let req = PaginationRequest::new().with_query("item_per_page", "1");
    p.prepare("people", &req, Criteria::new(), OrderBy::empty(), true)
        .unwrap();
    p.set_count_query(StoreQuery::Document(only_even))
        .set_select_query(StoreQuery::Document(select));
    let rs = object(p.fetch(HydrationMode::Object).await.unwrap());

    // ages are 18 + id % 50, so only id 2 has age 20
    assert_eq!(rs.total_items, 1);
    assert_eq!(ids(&rs.items), [2]);
}

#[tokio::test]
async fn callables_with_the_wrong_shape_are_rejected() {
    let store = CountingStore::with_people(5);
    let mut p = paginator(&store);
    let req = PaginationRequest::new();

    p.prepare("people", &req, Criteria::new(), OrderBy::empty(), true)
        .unwrap();
    p.set_count_items(Arc::new(FixedCount(json!("5"))));
    let err = p.fetch(HydrationMode::Object).await.unwrap_err();
    assert!(matches!(err, PaginationError::UnexpectedValue(_)), "{err:?}");

    p.prepare("people", &req, Criteria::new(), OrderBy::empty(), true)
        .unwrap();
    p.set_select_items(Arc::new(ObjectSelect));
    let err = p.fetch(HydrationMode::Object).await.unwrap_err();
    assert!(matches!(err, PaginationError::UnexpectedValue(_)), "{err:?}");

    p.prepare("people", &req, Criteria::new(), OrderBy::empty(), true)
        .unwrap();
    p.set_count_items(Arc::new(FailingCount));
    let err = p.fetch(HydrationMode::Object).await.unwrap_err();
    assert!(matches!(err, PaginationError::Callable(_)), "{err:?}");
    assert!(err.to_string().contains("count service unavailable"));
}

#[derive(Debug, Deserialize)]
struct Person {
    id: i64,
    name: String,
}

#[tokio::test]
async fn hydration_modes() {
    let store = CountingStore::with_people(3);
    let mut p = paginator(&store);
    let req = PaginationRequest::from_query_str("sort=name").unwrap();

    let array = p
        .paginate("people", &req, Criteria::new(), OrderBy::empty(), true, HydrationMode::Array)
        .await
        .unwrap()
        .into_array()
        .unwrap();
    assert_eq!(array["itemsPerPage"], 10);
    assert_eq!(array["totalPages"], 1);
    assert_eq!(array["orderBy"], json!({ "name": "ASC" }));
    assert_eq!(array["items"].as_array().unwrap().len(), 3);

    p.prepare("people", &req, Criteria::new(), OrderBy::empty(), true)
        .unwrap();
    let typed = p.fetch_into::<Person>().await.unwrap();
    assert_eq!(typed.items[0].id, 1);
    assert_eq!(typed.items[0].name, "person01");
}

#[tokio::test]
async fn snapshots_feed_the_view_context() {
    let store = CountingStore::with_people(15);
    let mut p = paginator(&store);

    assert!(matches!(
        p.view_context("people").unwrap_err(),
        PaginationError::SnapshotNotFound(_)
    ));
    assert!(matches!(
        p.default_view_context().unwrap_err(),
        PaginationError::NotPrepared
    ));

    let req = PaginationRequest::new().with_query("page", "2");
    p.paginate("people", &req, Criteria::new(), OrderBy::empty(), true, HydrationMode::Object)
        .await
        .unwrap();
    assert_eq!(p.current_manager_name(), Some("people"));

    let view = p.default_view_context().unwrap();
    assert_eq!(view.template.as_deref(), Some("pagination/default.html"));
    assert_eq!(view.manager_name, "people");
    assert_eq!(view.context.page, 2);
    assert_eq!(view.context.item_offset, 10);
    assert_eq!(view.context.total_items, 15);
    assert_eq!(view.context.total_pages, 2);
    assert_eq!(p.pagination_store().len(), 1);

    p.clear_store();
    assert!(p.pagination_store().is_empty());
    assert!(p.view_context("people").is_err());
}

#[tokio::test]
async fn relational_manager_rejects_a_document_store() {
    let store = CountingStore::with_people(1);
    let figment = Figment::new().merge(Serialized::defaults(json!({
        "pagination": { "db_driver": "orm" }
    })));
    let manager = PaginationManager::builder(PaginationConfig::from_figment(&figment).unwrap())
        .store("default", StoreHandle::Document(store))
        .model("people")
        .build()
        .unwrap();
    let err = Paginator::new(Arc::new(manager))
        .prepare("people", &PaginationRequest::new(), Criteria::new(), OrderBy::empty(), true)
        .map(|_| ())
        .unwrap_err();
    assert!(matches!(
        err,
        PaginationError::BackendNotSupported {
            expected: Driver::Relational,
            found: Driver::Document
        }
    ));
}

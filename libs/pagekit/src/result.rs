//! Page results and the snapshots kept for rendering.

use pagekit_query::OrderBy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::PaginationResult;

/// How `fetch` hands the page back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HydrationMode {
    /// A [`PaginationResultSet`].
    #[default]
    Object,
    /// The result set flattened to plain JSON.
    Array,
}

/// One fetched page.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResultSet<T = JsonValue> {
    pub page: u64,
    pub items_per_page: u64,
    pub order_by: OrderBy,
    pub item_offset: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub items: Vec<T>,
}

impl<T: Serialize> PaginationResultSet<T> {
    /// Plain JSON form: `page, itemsPerPage, orderBy, itemOffset, totalItems, totalPages, items`.
    ///
    /// # Errors
    /// Returns [`PaginationError::Hydration`](crate::PaginationError::Hydration)
    /// if an item fails to serialize.
    pub fn to_array(&self) -> PaginationResult<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }
}

impl<T> PaginationResultSet<T> {
    #[must_use]
    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            page: self.page,
            items_per_page: self.items_per_page,
            item_offset: self.item_offset,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

impl PaginationResultSet<JsonValue> {
    /// Deserialize every item into a model type.
    ///
    /// # Errors
    /// Returns [`PaginationError::Hydration`](crate::PaginationError::Hydration)
    /// on the first item that does not fit `T`.
    pub fn hydrate<T: DeserializeOwned>(self) -> PaginationResult<PaginationResultSet<T>> {
        let items = self
            .items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        Ok(PaginationResultSet {
            page: self.page,
            items_per_page: self.items_per_page,
            order_by: self.order_by,
            item_offset: self.item_offset,
            total_items: self.total_items,
            total_pages: self.total_pages,
            items,
        })
    }
}

/// Result of a fetch in the requested [`HydrationMode`].
#[derive(Clone, Debug, PartialEq)]
pub enum Fetched {
    Object(PaginationResultSet),
    Array(JsonValue),
}

impl Fetched {
    /// # Errors
    /// Returns [`PaginationError::Hydration`](crate::PaginationError::Hydration)
    /// if the array form cannot be built.
    pub fn new(result: PaginationResultSet, mode: HydrationMode) -> PaginationResult<Self> {
        Ok(match mode {
            HydrationMode::Object => Fetched::Object(result),
            HydrationMode::Array => Fetched::Array(result.to_array()?),
        })
    }

    #[must_use]
    pub fn into_object(self) -> Option<PaginationResultSet> {
        match self {
            Fetched::Object(rs) => Some(rs),
            Fetched::Array(_) => None,
        }
    }

    #[must_use]
    pub fn into_array(self) -> Option<JsonValue> {
        match self {
            Fetched::Array(v) => Some(v),
            Fetched::Object(_) => None,
        }
    }
}

/// Page metadata stored per manager after each fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub page: u64,
    pub items_per_page: u64,
    pub item_offset: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

/// What a pagination widget template needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewContext {
    pub template: Option<String>,
    pub manager_name: String,
    pub context: PageSnapshot,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use pagekit_query::SortDir;
    use serde_json::json;

    fn result_set() -> PaginationResultSet {
        PaginationResultSet {
            page: 2,
            items_per_page: 2,
            order_by: OrderBy::empty().with("name", SortDir::Asc),
            item_offset: 2,
            total_items: 5,
            total_pages: 3,
            items: vec![json!({ "id": 3, "name": "c" }), json!({ "id": 4, "name": "d" })],
        }
    }

    #[test]
    fn array_form_uses_camel_case_keys() {
        let array = result_set().to_array().unwrap();
        assert_eq!(
            array,
            json!({
                "page": 2,
                "itemsPerPage": 2,
                "orderBy": { "name": "ASC" },
                "itemOffset": 2,
                "totalItems": 5,
                "totalPages": 3,
                "items": [{ "id": 3, "name": "c" }, { "id": 4, "name": "d" }]
            })
        );
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: i64,
        name: String,
    }

    #[test]
    fn hydrate_maps_items_and_keeps_metadata() {
        let typed = result_set().hydrate::<Row>().unwrap();
        assert_eq!(typed.total_pages, 3);
        assert_eq!(typed.items[1], Row { id: 4, name: "d".to_owned() });

        let mut bad = result_set();
        bad.items.push(json!({ "id": "x" }));
        assert!(bad.hydrate::<Row>().is_err());
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let snap = result_set().snapshot();
        assert_eq!(
            serde_json::to_value(snap).unwrap(),
            json!({ "page": 2, "itemsPerPage": 2, "itemOffset": 2, "totalItems": 5, "totalPages": 3 })
        );
    }
}

//! Request parameter source.

use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::PaginationResult;

/// Read access to the pagination parameters of an incoming request.
pub trait RequestParams {
    /// Query-string value of `key`, falling back to a route attribute.
    fn query_or_attribute(&self, key: &str) -> Option<&str>;
}

impl<S: BuildHasher> RequestParams for HashMap<String, String, S> {
    fn query_or_attribute(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

/// Query pairs plus route attributes of one request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct PaginationRequest {
    query: Vec<(String, String)>,
    attributes: HashMap<String, String>,
}

impl PaginationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidRequest`](crate::PaginationError::InvalidRequest)
    /// if the string is not valid form encoding.
    pub fn from_query_str(query: &str) -> PaginationResult<Self> {
        let query: Vec<(String, String)> = serde_urlencoded::from_str(query)?;
        Ok(Self {
            query,
            attributes: HashMap::new(),
        })
    }

    /// # Errors
    /// Same as [`PaginationRequest::from_query_str`].
    pub fn from_uri(uri: &http::Uri) -> PaginationResult<Self> {
        Self::from_query_str(uri.query().unwrap_or_default())
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl RequestParams for PaginationRequest {
    fn query_or_attribute(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .or_else(|| self.attributes.get(key).map(String::as_str))
    }
}

/// Strictly positive integer made of ASCII digits only; anything else is ignored.
pub(crate) fn positive_int(raw: Option<&str>) -> Option<u64> {
    let raw = raw?;
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u64>().ok().filter(|n| *n > 0)
}

/// Split a multi-valued parameter, trimming items and dropping empty ones.
pub(crate) fn split_list(raw: Option<&str>, delimiter: &str) -> Vec<String> {
    raw.map(|s| {
        s.split(delimiter)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn query_wins_over_attributes_and_last_duplicate_wins() {
        let req = PaginationRequest::from_query_str("page=2&page=3&sort=name")
            .unwrap()
            .with_attribute("page", "9")
            .with_attribute("item_per_page", "5");
        assert_eq!(req.query_or_attribute("page"), Some("3"));
        assert_eq!(req.query_or_attribute("item_per_page"), Some("5"));
        assert_eq!(req.query_or_attribute("desc"), None);
    }

    #[test]
    fn from_uri_decodes_query() {
        let uri: http::Uri = "/users?sort=name%2Cage&desc=age".parse().unwrap();
        let req = PaginationRequest::from_uri(&uri).unwrap();
        assert_eq!(req.query_or_attribute("sort"), Some("name,age"));

        let bare: http::Uri = "/users".parse().unwrap();
        assert_eq!(PaginationRequest::from_uri(&bare).unwrap(), PaginationRequest::new());
    }

    #[test]
    fn positive_int_accepts_digits_only() {
        assert_eq!(positive_int(Some("12")), Some(12));
        assert_eq!(positive_int(Some("007")), Some(7));
        for bad in ["", "0", "-1", "+3", "1.5", " 4", "abc", "99999999999999999999999"] {
            assert_eq!(positive_int(Some(bad)), None, "{bad}");
        }
        assert_eq!(positive_int(None), None);
    }

    #[test]
    fn split_list_trims_and_drops_empties() {
        assert_eq!(split_list(Some("name, age,,"), ","), ["name", "age"]);
        assert_eq!(split_list(Some("a|b"), "|"), ["a", "b"]);
        assert!(split_list(None, ",").is_empty());
    }
}

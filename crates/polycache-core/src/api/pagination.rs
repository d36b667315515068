//! Page-by-page collection of list endpoints.
//!
//! Iteration stops on the first of: the server reports the last page
//! (`page * perPage >= count`), a page comes back empty or without the
//! expected fields, or `max_pages` requests have been issued. Whatever has
//! been collected up to that point is returned.

use serde_json::Value;
use tracing::{debug, warn};

use super::ApiError;

/// Pagination metadata of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u64,
    pub per_page: u64,
    pub count: u64,
}

impl PageInfo {
    /// Read `page`, `perPage` and `count`. Zero page sizes count as absent.
    pub fn from_response(response: &Value) -> Option<Self> {
        let page = response.get("page").and_then(Value::as_u64)?;
        let per_page = response.get("perPage").and_then(Value::as_u64)?;
        let count = response.get("count").and_then(Value::as_u64)?;
        if page == 0 || per_page == 0 {
            return None;
        }
        Some(Self {
            page,
            per_page,
            count,
        })
    }

    pub fn is_last(&self) -> bool {
        self.page.saturating_mul(self.per_page) >= self.count
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Paginator<'a> {
    items_field: &'a str,
    max_pages: u32,
}

impl<'a> Paginator<'a> {
    pub fn new(items_field: &'a str, max_pages: u32) -> Self {
        Self {
            items_field,
            max_pages: max_pages.max(1),
        }
    }

    /// Fetch pages through `fetch` and concatenate their items in order.
    ///
    /// `fetch` receives the page number to request. With `first_page` set
    /// to `None` the endpoint is treated as unpaginated: one request is
    /// issued with no page number.
    pub fn collect<F>(&self, first_page: Option<u64>, mut fetch: F) -> Result<Vec<Value>, ApiError>
    where
        F: FnMut(Option<u64>) -> Result<Value, ApiError>,
    {
        let mut items = Vec::new();
        let mut page = first_page;

        for fetched in 1..=self.max_pages {
            let response = fetch(page)?;

            let batch = match response.get(self.items_field).and_then(Value::as_array) {
                Some(batch) if !batch.is_empty() => batch,
                Some(_) => {
                    debug!(page = ?page, "Empty page, stopping");
                    break;
                }
                None => {
                    warn!(
                        page = ?page,
                        field = self.items_field,
                        "Page is missing its item list, stopping"
                    );
                    break;
                }
            };
            items.extend(batch.iter().cloned());

            let Some(current) = page else {
                break;
            };

            match PageInfo::from_response(&response) {
                Some(info) if info.is_last() => break,
                Some(_) => page = Some(current + 1),
                None => {
                    warn!(page = current, "Page is missing pagination fields, stopping");
                    break;
                }
            }

            if fetched == self.max_pages {
                warn!(
                    max_pages = self.max_pages,
                    collected = items.len(),
                    "Page limit reached, stopping"
                );
            }
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(page: u64, per_page: u64, count: u64, items: &[&str]) -> Value {
        json!({"page": page, "perPage": per_page, "count": count, "tickers": items})
    }

    #[test]
    fn test_page_info_is_last() {
        let info = PageInfo::from_response(&page(2, 50, 100, &[])).unwrap();
        assert!(info.is_last());
        let info = PageInfo::from_response(&page(1, 50, 100, &[])).unwrap();
        assert!(!info.is_last());
    }

    #[test]
    fn test_page_info_rejects_missing_or_zero_fields() {
        assert!(PageInfo::from_response(&json!({"page": 1, "perPage": 50})).is_none());
        assert!(PageInfo::from_response(&page(0, 50, 100, &[])).is_none());
        assert!(PageInfo::from_response(&page(1, 0, 100, &[])).is_none());
    }

    #[test]
    fn test_collects_pages_in_order() {
        let pages = [
            page(1, 2, 5, &["A", "B"]),
            page(2, 2, 5, &["C", "D"]),
            page(3, 2, 5, &["E"]),
        ];
        let mut requested = Vec::new();

        let items = Paginator::new("tickers", 100)
            .collect(Some(1), |p| {
                requested.push(p);
                Ok(pages[requested.len() - 1].clone())
            })
            .unwrap();

        assert_eq!(items, vec![json!("A"), json!("B"), json!("C"), json!("D"), json!("E")]);
        assert_eq!(requested, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_single_page_when_first_page_is_last() {
        let mut calls = 0;
        let items = Paginator::new("tickers", 100)
            .collect(Some(1), |_| {
                calls += 1;
                Ok(page(1, 50, 3, &["A", "B", "C"]))
            })
            .unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_unpaginated_issues_one_request_without_page() {
        let mut requested = Vec::new();
        let items = Paginator::new("tickers", 100)
            .collect(None, |p| {
                requested.push(p);
                Ok(page(1, 1, 1000, &["A", "B"]))
            })
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(requested, vec![None]);
    }

    #[test]
    fn test_cap_bounds_pathological_count() {
        let mut calls = 0u32;
        let items = Paginator::new("tickers", 7)
            .collect(Some(1), |_| {
                calls += 1;
                // count never satisfied: the server always claims page 1
                Ok(page(1, 1, u64::MAX, &["A"]))
            })
            .unwrap();
        assert_eq!(calls, 7);
        assert_eq!(items.len(), 7);
    }

    #[test]
    fn test_malformed_page_stops_with_accumulated_items() {
        let pages = [
            page(1, 1, 10, &["A"]),
            json!({"tickers": ["B"], "status": "OK"}),
            page(3, 1, 10, &["C"]),
        ];
        let mut calls = 0;
        let items = Paginator::new("tickers", 100)
            .collect(Some(1), |_| {
                calls += 1;
                Ok(pages[calls - 1].clone())
            })
            .unwrap();
        assert_eq!(items, vec![json!("A"), json!("B")]);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_missing_or_empty_item_list_stops() {
        let mut calls = 0;
        let items = Paginator::new("tickers", 100)
            .collect(Some(1), |_| {
                calls += 1;
                Ok(json!({"status": "ERROR"}))
            })
            .unwrap();
        assert!(items.is_empty());
        assert_eq!(calls, 1);

        let items = Paginator::new("tickers", 100)
            .collect(Some(1), |_| Ok(page(1, 50, 1000, &[])))
            .unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_fetch_error_propagates() {
        let err = Paginator::new("tickers", 100)
            .collect(Some(1), |_| Err(ApiError::from_status(500, "boom")))
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}

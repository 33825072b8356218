//! Lazy iteration over pageable list endpoints.
//!
//! List endpoints return one page per request under an `items` key. The
//! engine walks them with a pull-based iterator: each exhausted page triggers
//! exactly one further request, so a caller that stops after the first match
//! never pays for the remaining pages.

use crate::connection::ApiConnection;
use crate::error::OperationResult;
use crate::resource::core::ConfigResource;
use crate::spec::OperationSpec;
use log::debug;
use serde_json::{Map, Value};
use std::collections::VecDeque;

const DEFAULT_PAGE_SIZE: u64 = 10;
const DEFAULT_OFFSET: u64 = 0;

/// Forward-only iterator over the items of a pageable operation.
///
/// Yields `Ok(item)` for every item in page order. A failed page fetch yields
/// one `Err` and ends the sequence; so does the first page whose `items` list
/// is empty or missing. Not restartable: a fresh iterator re-scans from the
/// starting offset.
///
/// Limit and offset are written into the query parameters of every request,
/// including the first; all other caller-supplied query parameters are passed
/// through unchanged on every page.
pub(crate) struct PagedItems<'a, C: ApiConnection> {
    resource: &'a ConfigResource<C>,
    spec: OperationSpec,
    query_params: Map<String, Value>,
    path_params: Map<String, Value>,
    limit: u64,
    offset: u64,
    buffered: VecDeque<Value>,
    finished: bool,
}

impl<'a, C: ApiConnection> PagedItems<'a, C> {
    /// Start a scan at the caller's offset (or the default).
    ///
    /// `limit` and `offset` overrides are read from `query_params` and accept
    /// numbers or numeric strings; anything else falls back to the defaults.
    pub(crate) fn new(
        resource: &'a ConfigResource<C>,
        spec: OperationSpec,
        query_params: Map<String, Value>,
        path_params: Map<String, Value>,
    ) -> Self {
        let limit = page_param(&query_params, "limit", DEFAULT_PAGE_SIZE);
        let offset = page_param(&query_params, "offset", DEFAULT_OFFSET);
        Self {
            resource,
            spec,
            query_params,
            path_params,
            limit,
            offset,
            buffered: VecDeque::new(),
            finished: false,
        }
    }

    fn fetch_page(&mut self) -> OperationResult<Vec<Value>> {
        let mut query = self.query_params.clone();
        query.insert("limit".to_string(), Value::from(self.limit));
        query.insert("offset".to_string(), Value::from(self.offset));

        debug!(
            "fetching page of '{}' at offset {} (limit {})",
            self.spec.name, self.offset, self.limit
        );
        let page = self.resource.dispatch_request(
            &self.spec.url,
            self.spec.method,
            None,
            Some(&self.path_params),
            Some(&query),
        )?;

        let items = page
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(items)
    }
}

impl<C: ApiConnection> Iterator for PagedItems<'_, C> {
    type Item = OperationResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(item) = self.buffered.pop_front() {
            return Some(Ok(item));
        }
        if self.finished {
            return None;
        }

        match self.fetch_page() {
            Ok(items) if items.is_empty() => {
                self.finished = true;
                None
            }
            Ok(items) => {
                self.buffered.extend(items);
                self.offset += self.limit;
                self.buffered.pop_front().map(Ok)
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

fn page_param(params: &Map<String, Value>, key: &str, default: u64) -> u64 {
    match params.get(key) {
        Some(Value::Number(number)) => number.as_u64().unwrap_or(default),
        Some(Value::String(text)) => text.parse().unwrap_or(default),
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("test value must be an object")
    }

    #[test]
    fn page_param_accepts_numbers_and_numeric_strings() {
        assert_eq!(page_param(&params(json!({"limit": 25})), "limit", 10), 25);
        assert_eq!(page_param(&params(json!({"limit": "25"})), "limit", 10), 25);
    }

    #[test]
    fn page_param_falls_back_on_missing_or_unusable_values() {
        assert_eq!(page_param(&params(json!({})), "limit", 10), 10);
        assert_eq!(page_param(&params(json!({"limit": "many"})), "limit", 10), 10);
        assert_eq!(page_param(&params(json!({"limit": -5})), "limit", 10), 10);
        assert_eq!(page_param(&params(json!({"limit": null})), "limit", 10), 10);
        assert_eq!(page_param(&params(json!({"offset": true})), "offset", 0), 0);
    }
}

//! Client-side filtered finds over list operations.
//!
//! Some backends cannot filter on the server, so the engine fetches the full
//! (paged) collection and filters locally. The filter map is also forwarded
//! to the server inside a single `filters` query parameter for backends that
//! can narrow the scan; the client-side match stays authoritative either way.

use crate::connection::ApiConnection;
use crate::error::OperationResult;
use crate::params::RequestParams;
use crate::resource::core::ConfigResource;
use crate::resource::paging::PagedItems;
use crate::spec::OperationSpec;
use serde_json::{Map, Value};

impl<C: ApiConnection> ConfigResource<C> {
    /// All objects of a list operation that match the caller's filters.
    ///
    /// Read-only: never gated by check mode. An empty filter map matches
    /// every item, so this degenerates to a full collection scan.
    pub fn find_objects_by_filter(
        &self,
        operation_name: &str,
        params: &RequestParams,
    ) -> OperationResult<Vec<Value>> {
        let spec = self.require_spec(operation_name)?;
        self.validate_params(&spec, params)?;

        let mut found = Vec::new();
        for item in self.paged_items(&spec, params) {
            let item = item?;
            if matches_filters(&params.filters, &item) {
                found.push(item);
            }
        }
        Ok(found)
    }

    /// First object matching the caller's filters, if any.
    ///
    /// Stops pulling pages as soon as a match is found, so a hit on the first
    /// page costs a single request.
    pub fn find_object_by_filter(
        &self,
        operation_name: &str,
        params: &RequestParams,
    ) -> OperationResult<Option<Value>> {
        let spec = self.require_spec(operation_name)?;
        self.validate_params(&spec, params)?;

        for item in self.paged_items(&spec, params) {
            let item = item?;
            if matches_filters(&params.filters, &item) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    fn paged_items(&self, spec: &OperationSpec, params: &RequestParams) -> PagedItems<'_, C> {
        let mut query_params = params.query_params.clone();
        if !params.filters.is_empty() {
            query_params.insert(
                "filters".to_string(),
                Value::String(serialize_filters(&params.filters)),
            );
        }
        PagedItems::new(self, spec.clone(), query_params, params.path_params.clone())
    }
}

/// Render filters as one query-string value: `key:value` pairs joined by `;`,
/// in key order. String values go in bare, everything else as JSON.
fn serialize_filters(filters: &Map<String, Value>) -> String {
    filters
        .iter()
        .map(|(key, value)| format!("{key}:{}", filter_value(value)))
        .collect::<Vec<_>>()
        .join(";")
}

fn filter_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// An item matches when every filter key is present with an equal top-level
/// value; extra item fields are ignored.
fn matches_filters(filters: &Map<String, Value>, item: &Value) -> bool {
    filters
        .iter()
        .all(|(key, expected)| item.get(key) == Some(expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("test value must be an object")
    }

    #[test]
    fn filters_serialize_in_key_order() {
        let filters = map(json!({"type": "host", "name": "dmz", "port": 22}));
        assert_eq!(serialize_filters(&filters), "name:dmz;port:22;type:host");
    }

    #[test]
    fn string_filter_values_are_not_quoted() {
        let filters = map(json!({"name": "dmz-host"}));
        assert_eq!(serialize_filters(&filters), "name:dmz-host");
    }

    #[test]
    fn match_requires_equal_top_level_values() {
        let item = json!({"name": "dmz", "type": "host", "id": "abc"});
        assert!(matches_filters(&map(json!({"name": "dmz"})), &item));
        assert!(matches_filters(&map(json!({})), &item));
        assert!(!matches_filters(&map(json!({"name": "other"})), &item));
        assert!(!matches_filters(&map(json!({"missing": "x"})), &item));
    }
}

//! Caller-supplied request parameters.
//!
//! One [`RequestParams`] value carries everything a caller hands to an
//! operation: the body payload, query parameters, path parameters, and the
//! client-side filters. Categories the caller omits default to empty maps, so
//! handlers never branch on presence.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters for one operation call, grouped by category.
///
/// Deserializes from host-process JSON with every category optional:
///
/// ```rust
/// use declarest::RequestParams;
/// use serde_json::json;
///
/// let params: RequestParams = serde_json::from_value(json!({
///     "data": {"name": "dmz-host", "value": "10.1.1.1"},
///     "path_params": {"objId": "123"}
/// })).unwrap();
/// assert!(params.query_params.is_empty());
/// assert!(params.filters.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestParams {
    /// Request body fields for create/replace operations.
    pub data: Map<String, Value>,
    /// Query-string parameters.
    pub query_params: Map<String, Value>,
    /// Values substituted into the URL template.
    pub path_params: Map<String, Value>,
    /// Client-side filter constraints; an empty map means no filtering.
    pub filters: Map<String, Value>,
}

impl RequestParams {
    /// Parameters with every category empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the body payload.
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Replace the query parameters.
    pub fn with_query_params(mut self, query_params: Map<String, Value>) -> Self {
        self.query_params = query_params;
        self
    }

    /// Replace the path parameters.
    pub fn with_path_params(mut self, path_params: Map<String, Value>) -> Self {
        self.path_params = path_params;
        self
    }

    /// Replace the filter constraints.
    pub fn with_filters(mut self, filters: Map<String, Value>) -> Self {
        self.filters = filters;
        self
    }
}

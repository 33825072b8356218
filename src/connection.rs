//! Connection trait for the transport and metadata collaborator.
//!
//! This module defines the seam between the engine and whatever actually talks
//! to the REST backend. The engine never opens sockets, never parses API
//! metadata, and never inspects field-level schemas; it asks the connection for
//! all three. Connection pooling, retries, and authentication live behind this
//! trait as well.
//!
//! # Key Types
//!
//! - [`ApiConnection`] - trait implemented by the host's transport layer
//! - [`ResponseEnvelope`] - uniform wrapper for every transport answer
//!
//! # Examples
//!
//! See the crate-level Quick Start for a complete in-memory implementation;
//! real hosts typically wrap an HTTP client plus a parsed API model.

use crate::spec::{HttpMethod, OperationSpec};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Uniform transport answer.
///
/// The transport reports failure inside the envelope rather than through a
/// Rust error: a non-success envelope carries the HTTP status code and the
/// body exactly as the server produced them. The engine never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    /// Whether the request succeeded at the HTTP level.
    pub success: bool,
    /// HTTP status code of the response.
    pub status_code: u16,
    /// Response body, an object or an array depending on the endpoint.
    pub response: Value,
}

impl ResponseEnvelope {
    /// A successful envelope with status 200.
    pub fn ok(response: Value) -> Self {
        Self {
            success: true,
            status_code: 200,
            response,
        }
    }

    /// A failed envelope with the given status code and body.
    pub fn error(status_code: u16, response: Value) -> Self {
        Self {
            success: false,
            status_code,
            response,
        }
    }
}

/// Transport and metadata collaborator contract.
///
/// Implementations own every backend-specific concern: URL templating against
/// path parameters, session handling, and access to the parsed API model that
/// describes the available operations. The engine drives this trait through
/// blocking calls on a single thread; implementations are free to block on I/O.
///
/// Validation methods return `Ok(())` for a valid parameter set and
/// `Err(detail)` otherwise, where `detail` is an arbitrary JSON description of
/// what failed. The engine aggregates such details per category; it never
/// interprets them.
pub trait ApiConnection {
    /// Look up the specification for a single named operation.
    ///
    /// Returns `None` when the metadata source does not know the name. The
    /// engine caches both answers for the lifetime of the resource instance.
    fn get_operation_spec(&self, operation_name: &str) -> Option<OperationSpec>;

    /// Look up all operation specifications owned by a model.
    ///
    /// Returns an empty map for unknown models. Keys are operation names; the
    /// engine backfills its name-keyed cache from this map.
    fn get_operation_specs_by_model_name(
        &self,
        model_name: &str,
    ) -> HashMap<String, OperationSpec>;

    /// Send one request and return its envelope.
    ///
    /// `url_path` is the operation's URL template; `path_params` carry the
    /// values to substitute into it. Parameter categories the operation does
    /// not use arrive as `None`.
    fn send_request(
        &self,
        url_path: &str,
        http_method: HttpMethod,
        body_params: Option<&Map<String, Value>>,
        path_params: Option<&Map<String, Value>>,
        query_params: Option<&Map<String, Value>>,
    ) -> ResponseEnvelope;

    /// Validate query parameters for the named operation.
    fn validate_query_params(
        &self,
        operation_name: &str,
        params: &Map<String, Value>,
    ) -> Result<(), Value>;

    /// Validate path parameters for the named operation.
    fn validate_path_params(
        &self,
        operation_name: &str,
        params: &Map<String, Value>,
    ) -> Result<(), Value>;

    /// Validate the request body for the named operation.
    ///
    /// Only consulted for operations whose method carries a body (POST/PUT).
    fn validate_data(
        &self,
        operation_name: &str,
        params: &Map<String, Value>,
    ) -> Result<(), Value>;
}

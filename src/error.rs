//! Error types for configuration-resource operations.
//!
//! This module provides the full failure taxonomy for the engine. Every expected
//! failure path maps to exactly one [`OperationError`] variant, so hosts can route
//! on the variant instead of parsing messages.

use serde_json::{Map, Value};
use std::fmt;

/// Main error type for configuration-resource operations.
///
/// The variants form a closed taxonomy: unknown operation names, aggregated
/// parameter-validation failures, server-reported failures, semantic conflicts
/// detected during reconciliation, and the check-mode abort signal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OperationError {
    /// The operation name has no specification known to the metadata source.
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// One or more parameter categories failed validation. No request was sent.
    #[error("parameter validation failed: {0}")]
    Validation(ValidationReport),

    /// The server answered with a non-success envelope.
    #[error("server returned status {status_code}: {body}")]
    Server {
        /// HTTP status code reported by the transport.
        status_code: u16,
        /// Response body as received, untouched.
        body: Value,
    },

    /// Reconciliation found a semantic conflict between the requested and the
    /// actual configuration.
    #[error("{message}")]
    Configuration {
        /// Human-readable description of the conflict.
        message: String,
        /// The conflicting object currently present on the server, when known.
        existing: Option<Value>,
    },

    /// The resource runs in check mode; the mutating request was validated but
    /// deliberately not sent. An expected control signal, not a failure.
    #[error("check mode is enabled, request not sent")]
    CheckModeAbort,
}

impl OperationError {
    /// Create a server error from an envelope's status code and body.
    pub fn server(status_code: u16, body: Value) -> Self {
        Self::Server { status_code, body }
    }

    /// Create a configuration conflict without an attached object.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            existing: None,
        }
    }

    /// Create a configuration conflict carrying the existing server-side object.
    pub fn configuration_with_existing(message: impl Into<String>, existing: Value) -> Self {
        Self::Configuration {
            message: message.into(),
            existing: Some(existing),
        }
    }
}

/// Aggregate report of failed parameter categories.
///
/// Keys are the fixed category labels ("Invalid query_params provided",
/// "Invalid path_params provided", "Invalid data provided"); values carry the
/// detail returned by the validator collaborator. An empty report means every
/// attempted category passed.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct ValidationReport(Map<String, Value>);

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failing category under its label.
    pub fn insert(&mut self, label: impl Into<String>, detail: Value) {
        self.0.insert(label.into(), detail);
    }

    /// True when no category failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing categories.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Detail recorded for a label, if that category failed.
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.0.get(label)
    }

    /// Iterate over `(label, detail)` entries in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.0) {
            Ok(rendered) => f.write_str(&rendered),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}

impl From<ValidationReport> for Value {
    fn from(report: ValidationReport) -> Self {
        Value::Object(report.0)
    }
}

/// Result alias used throughout the engine.
pub type OperationResult<T> = Result<T, OperationError>;

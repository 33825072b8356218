//! Tagged outcome returned by the [`ConfigResource::perform`] entry point.
//!
//! Hosts that drive the engine through `perform` get one flat enum instead of
//! a `Result` they would have to match twice. Internals keep working with
//! [`OperationResult`] and `?`; the conversion happens once, at this boundary.
//!
//! [`ConfigResource::perform`]: crate::resource::ConfigResource::perform

use crate::error::{OperationError, OperationResult, ValidationReport};
use serde_json::Value;

/// Result of one dispatched operation, flattened for host consumption.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    /// The operation completed; carries the response body (an object for CRUD
    /// operations, an array for filtered finds).
    Success(Value),
    /// No specification exists for the requested operation name.
    UnknownOperation(String),
    /// Parameter validation failed; nothing was sent.
    ValidationFailed(ValidationReport),
    /// Check mode is enabled; the mutating request was validated and skipped.
    DryRunAborted,
    /// The server answered with a non-success envelope.
    ServerFailed {
        /// HTTP status code reported by the transport.
        status_code: u16,
        /// Response body as received.
        body: Value,
    },
    /// Reconciliation detected a semantic conflict.
    ConfigConflict {
        /// Description of the conflict.
        message: String,
        /// The conflicting server-side object, when known.
        existing: Option<Value>,
    },
}

impl OperationOutcome {
    /// True for [`OperationOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, OperationOutcome::Success(_))
    }

    /// The response body for a successful outcome, `None` otherwise.
    pub fn into_success(self) -> Option<Value> {
        match self {
            OperationOutcome::Success(body) => Some(body),
            _ => None,
        }
    }
}

impl From<OperationResult<Value>> for OperationOutcome {
    fn from(result: OperationResult<Value>) -> Self {
        match result {
            Ok(body) => OperationOutcome::Success(body),
            Err(OperationError::UnknownOperation(name)) => {
                OperationOutcome::UnknownOperation(name)
            }
            Err(OperationError::Validation(report)) => {
                OperationOutcome::ValidationFailed(report)
            }
            Err(OperationError::Server { status_code, body }) => {
                OperationOutcome::ServerFailed { status_code, body }
            }
            Err(OperationError::Configuration { message, existing }) => {
                OperationOutcome::ConfigConflict { message, existing }
            }
            Err(OperationError::CheckModeAbort) => OperationOutcome::DryRunAborted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_carries_the_body() {
        let outcome = OperationOutcome::from(Ok(json!({"id": "1"})));
        assert!(outcome.is_success());
        assert_eq!(outcome.into_success(), Some(json!({"id": "1"})));
    }

    #[test]
    fn every_error_variant_maps_to_its_outcome() {
        let unknown: OperationOutcome =
            Err::<Value, _>(OperationError::UnknownOperation("nope".into())).into();
        assert_eq!(unknown, OperationOutcome::UnknownOperation("nope".into()));

        let mut report = ValidationReport::new();
        report.insert("Invalid data provided", json!("name is required"));
        let validation: OperationOutcome =
            Err::<Value, _>(OperationError::Validation(report.clone())).into();
        assert_eq!(validation, OperationOutcome::ValidationFailed(report));

        let server: OperationOutcome =
            Err::<Value, _>(OperationError::server(500, json!("boom"))).into();
        assert_eq!(
            server,
            OperationOutcome::ServerFailed {
                status_code: 500,
                body: json!("boom")
            }
        );

        let conflict: OperationOutcome = Err::<Value, _>(
            OperationError::configuration_with_existing("differs", json!({"id": "1"})),
        )
        .into();
        assert_eq!(
            conflict,
            OperationOutcome::ConfigConflict {
                message: "differs".into(),
                existing: Some(json!({"id": "1"}))
            }
        );

        let aborted: OperationOutcome = Err::<Value, _>(OperationError::CheckModeAbort).into();
        assert_eq!(aborted, OperationOutcome::DryRunAborted);
        assert!(!aborted.is_success());
        assert_eq!(aborted.into_success(), None);
    }
}

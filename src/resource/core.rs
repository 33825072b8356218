//! The configuration resource: dispatch, check mode, and request plumbing.
//!
//! [`ConfigResource`] is the engine's owner struct. It resolves operation
//! specifications through a per-instance cache, classifies each call, routes
//! it to the matching handler, and funnels every outgoing request through one
//! dispatcher that tracks whether the session changed anything.

use crate::connection::ApiConnection;
use crate::error::{OperationError, OperationResult};
use crate::params::RequestParams;
use crate::resource::outcome::OperationOutcome;
use crate::spec::{HttpMethod, OperationKind, OperationSpec, SpecCache};
use log::{debug, info, warn};
use serde_json::{Map, Value};
use std::cell::Cell;
use std::collections::HashMap;

/// Engine for idempotent configuration operations against one backend.
///
/// Owns the connection collaborator, the per-instance specification cache,
/// and the monotonic configuration-changed flag. The caches and the flag use
/// interior mutability, so an instance is deliberately not `Sync`; callers
/// needing concurrent access must add their own synchronization.
pub struct ConfigResource<C: ApiConnection> {
    conn: C,
    check_mode: bool,
    config_changed: Cell<bool>,
    specs: SpecCache,
}

impl<C: ApiConnection> ConfigResource<C> {
    /// Create a resource over the given connection, check mode off.
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            check_mode: false,
            config_changed: Cell::new(false),
            specs: SpecCache::new(),
        }
    }

    /// Toggle check mode (dry run).
    ///
    /// With check mode on, mutating operations validate their parameters and
    /// then abort before any request is sent; read-only operations run
    /// normally.
    pub fn check_mode(mut self, check_mode: bool) -> Self {
        self.check_mode = check_mode;
        self
    }

    /// Perform the named operation, classifying it from its specification.
    ///
    /// The single host-facing entry point: every failure mode comes back as
    /// an [`OperationOutcome`] variant instead of an error. List operations
    /// called with a non-empty `filters` map return the filtered items as an
    /// array; everything else returns the response body of the one request
    /// the operation boiled down to.
    pub fn perform(&self, operation_name: &str, params: &RequestParams) -> OperationOutcome {
        let result = self.execute(operation_name, params);
        match &result {
            Ok(_) => debug!("operation '{operation_name}' completed"),
            Err(OperationError::CheckModeAbort) => {
                debug!("operation '{operation_name}' validated and skipped, check mode is on");
            }
            Err(error) => warn!("operation '{operation_name}' failed: {error}"),
        }
        result.into()
    }

    fn execute(&self, operation_name: &str, params: &RequestParams) -> OperationResult<Value> {
        let spec = self.require_spec(operation_name)?;
        let kind = spec.kind(params);
        info!("performing {kind:?} operation '{operation_name}'");

        match kind {
            OperationKind::Add => self.add_object(operation_name, params),
            OperationKind::Edit => self.edit_object(operation_name, params),
            OperationKind::Delete => self.delete_object(operation_name, params),
            OperationKind::FindByFilter => self
                .find_objects_by_filter(operation_name, params)
                .map(Value::Array),
            // An unfiltered list is a plain pass-through: the server's own
            // paging envelope goes back to the caller untouched.
            OperationKind::FindAll | OperationKind::General => {
                self.send_general_request(operation_name, params)
            }
        }
    }

    /// Send a request exactly as the operation's specification describes it.
    ///
    /// No reconciliation and no response shaping; only validation and, for
    /// non-GET methods, the check-mode gate apply.
    pub fn send_general_request(
        &self,
        operation_name: &str,
        params: &RequestParams,
    ) -> OperationResult<Value> {
        let spec = self.require_spec(operation_name)?;
        self.validate_params(&spec, params)?;
        if !spec.method.is_read_only() {
            self.stop_if_check_mode()?;
        }

        self.dispatch_request(
            &spec.url,
            spec.method,
            Some(&params.data),
            Some(&params.path_params),
            Some(&params.query_params),
        )
    }

    /// Specification for the named operation, memoized for this instance.
    pub fn operation_spec(&self, operation_name: &str) -> Option<OperationSpec> {
        self.specs.spec_by_name(operation_name, |name| {
            debug!("fetching specification for operation '{name}'");
            self.conn.get_operation_spec(name)
        })
    }

    /// All specifications owned by a model, memoized for this instance.
    ///
    /// An empty map means the metadata source does not know the model.
    pub fn operation_specs_for_model(
        &self,
        model_name: &str,
    ) -> HashMap<String, OperationSpec> {
        self.specs.specs_by_model(model_name, |model| {
            debug!("fetching operation specifications for model '{model}'");
            self.conn.get_operation_specs_by_model_name(model)
        })
    }

    /// True once any non-GET request has succeeded on this instance.
    ///
    /// Monotonic: never reset. Hosts report this as "changed" state.
    pub fn config_changed(&self) -> bool {
        self.config_changed.get()
    }

    /// The underlying connection collaborator.
    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub(super) fn require_spec(&self, operation_name: &str) -> OperationResult<OperationSpec> {
        self.operation_spec(operation_name)
            .ok_or_else(|| OperationError::UnknownOperation(operation_name.to_string()))
    }

    pub(super) fn stop_if_check_mode(&self) -> OperationResult<()> {
        if self.check_mode {
            return Err(OperationError::CheckModeAbort);
        }
        Ok(())
    }

    /// Send one request and unwrap its envelope.
    ///
    /// A non-success envelope becomes [`OperationError::Server`]. A succeeded
    /// non-GET request flips the configuration-changed flag.
    pub(super) fn dispatch_request(
        &self,
        url: &str,
        method: HttpMethod,
        body_params: Option<&Map<String, Value>>,
        path_params: Option<&Map<String, Value>>,
        query_params: Option<&Map<String, Value>>,
    ) -> OperationResult<Value> {
        debug!("sending {method} {url}");
        let envelope = self
            .conn
            .send_request(url, method, body_params, path_params, query_params);

        if !envelope.success {
            warn!("{method} {url} failed with status {}", envelope.status_code);
            return Err(OperationError::server(
                envelope.status_code,
                envelope.response,
            ));
        }
        if !method.is_read_only() {
            self.config_changed.set(true);
        }
        Ok(envelope.response)
    }
}

//! Create, replace, and delete handlers with idempotency reconciliation.
//!
//! Declarative callers describe the state they want, not the request they
//! want sent. These handlers absorb the two backend answers that would
//! otherwise break idempotent retries: a duplicate-name rejection on create
//! when an equal object already exists, and an unknown-id rejection on delete
//! when the object is already gone.

use crate::compare::objects_equal;
use crate::connection::ApiConnection;
use crate::error::{OperationError, OperationResult};
use crate::params::RequestParams;
use crate::resource::core::ConfigResource;
use crate::spec::{HttpMethod, OperationSpec};
use log::debug;
use serde_json::{Map, Value, json};

const UNPROCESSABLE_ENTITY_STATUS: u16 = 422;
const DUPLICATE_NAME_ERROR: &str = "Validation failed due to a duplicate name";
const INVALID_UUID_ERROR: &str = "Validation failed due to an invalid UUID";
const REFERENCED_OBJECT_MISSING: &str = "Referenced object does not exist";
const DUPLICATE_OBJECT_CONFLICT: &str = "Cannot add new object. \
     An object with the same name but different parameters already exists.";

impl<C: ApiConnection> ConfigResource<C> {
    /// Create an object, treating an equal pre-existing one as success.
    ///
    /// A duplicate-name rejection triggers reconciliation: the engine looks
    /// the object up through the model's list operation and returns it when
    /// it deep-matches the submitted data. A same-named object with different
    /// fields is a [`OperationError::Configuration`] conflict carrying that
    /// object; when the model cannot be searched the original server error is
    /// rethrown unchanged.
    pub fn add_object(
        &self,
        operation_name: &str,
        params: &RequestParams,
    ) -> OperationResult<Value> {
        let spec = self.require_spec(operation_name)?;
        self.validate_params(&spec, params)?;
        self.stop_if_check_mode()?;

        match self.dispatch_request(
            &spec.url,
            spec.method,
            Some(&params.data),
            Some(&params.path_params),
            Some(&params.query_params),
        ) {
            Ok(created) => Ok(created),
            Err(error) if is_duplicate_name_error(&error) => {
                debug!(
                    "duplicate name reported for '{}', checking the existing object",
                    operation_name
                );
                self.reconcile_duplicate(&spec, params, error)
            }
            Err(error) => Err(error),
        }
    }

    /// Replace an object, skipping the write when nothing would change.
    ///
    /// The target is probed with a GET first: a blank answer (null, empty
    /// object/array/string) means the referenced object does not exist; an
    /// answer deep-matching the submitted data is returned as-is without a
    /// write.
    pub fn edit_object(
        &self,
        operation_name: &str,
        params: &RequestParams,
    ) -> OperationResult<Value> {
        let spec = self.require_spec(operation_name)?;
        self.validate_params(&spec, params)?;
        self.stop_if_check_mode()?;

        let existing = self.dispatch_request(
            &spec.url,
            HttpMethod::Get,
            None,
            Some(&params.path_params),
            None,
        )?;
        if is_blank(&existing) {
            return Err(OperationError::configuration(REFERENCED_OBJECT_MISSING));
        }
        if objects_equal(&existing, &params.data) {
            debug!(
                "object targeted by '{}' already matches the submitted data, skipping the write",
                operation_name
            );
            return Ok(existing);
        }

        self.dispatch_request(
            &spec.url,
            spec.method,
            Some(&params.data),
            Some(&params.path_params),
            Some(&params.query_params),
        )
    }

    /// Delete an object, tolerating a target that is already gone.
    ///
    /// An invalid-UUID rejection means there is nothing to delete; it is
    /// swallowed and a synthetic `{"status": "Referenced object does not
    /// exist"}` body is returned so retried deletes converge.
    pub fn delete_object(
        &self,
        operation_name: &str,
        params: &RequestParams,
    ) -> OperationResult<Value> {
        let spec = self.require_spec(operation_name)?;
        self.validate_params(&spec, params)?;
        self.stop_if_check_mode()?;

        match self.dispatch_request(&spec.url, spec.method, None, Some(&params.path_params), None)
        {
            Ok(result) => Ok(result),
            Err(error) if is_invalid_uuid_error(&error) => {
                debug!("object targeted by '{}' is already absent", operation_name);
                Ok(json!({ "status": REFERENCED_OBJECT_MISSING }))
            }
            Err(error) => Err(error),
        }
    }

    /// Decide whether a duplicate-name rejection was actually a replay.
    ///
    /// Gives up and rethrows the original error when the model cannot be
    /// searched: no model name on the spec, no list operation for the model,
    /// no `name` in the submitted data to filter on, or no matching object.
    fn reconcile_duplicate(
        &self,
        spec: &OperationSpec,
        params: &RequestParams,
        original: OperationError,
    ) -> OperationResult<Value> {
        let Some(model_name) = spec.model_name.as_deref() else {
            return Err(original);
        };
        let Some(find_operation) = self.find_all_operation_name(model_name) else {
            debug!("model '{model_name}' has no list operation, keeping the original error");
            return Err(original);
        };

        let filters = if params.filters.is_empty() {
            let Some(name) = params.data.get("name") else {
                return Err(original);
            };
            let mut by_name = Map::new();
            by_name.insert("name".to_string(), name.clone());
            by_name
        } else {
            params.filters.clone()
        };

        let lookup = params.clone().with_filters(filters);
        match self.find_object_by_filter(&find_operation, &lookup)? {
            Some(existing) if objects_equal(&existing, &params.data) => {
                debug!("an equal object already exists, treating the add as already applied");
                Ok(existing)
            }
            Some(existing) => Err(OperationError::configuration_with_existing(
                DUPLICATE_OBJECT_CONFLICT,
                existing,
            )),
            None => Err(original),
        }
    }

    /// Name of the model's list operation, when one is discoverable.
    ///
    /// Model maps are unordered; the smallest matching name is picked so
    /// reconciliation behaves the same run to run.
    fn find_all_operation_name(&self, model_name: &str) -> Option<String> {
        self.operation_specs_for_model(model_name)
            .values()
            .filter(|spec| spec.is_find_all_operation())
            .map(|spec| spec.name.clone())
            .min()
    }
}

fn is_duplicate_name_error(error: &OperationError) -> bool {
    is_unprocessable_with(error, DUPLICATE_NAME_ERROR)
}

fn is_invalid_uuid_error(error: &OperationError) -> bool {
    is_unprocessable_with(error, INVALID_UUID_ERROR)
}

fn is_unprocessable_with(error: &OperationError, message: &str) -> bool {
    match error {
        OperationError::Server { status_code, body } => {
            *status_code == UNPROCESSABLE_ENTITY_STATUS && body.to_string().contains(message)
        }
        _ => false,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(fields) => fields.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

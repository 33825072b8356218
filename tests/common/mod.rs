//! Shared test doubles for driving the engine without a real backend.
//!
//! [`FakeConnection`] is a scripted [`ApiConnection`]: tests preload operation
//! specifications, queue response envelopes in send order, and afterwards
//! inspect every request exactly as the engine dispatched it.

#![allow(dead_code)]

use declarest::{ApiConnection, HttpMethod, OperationSpec, ResponseEnvelope};
use serde_json::{Map, Value, json};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

/// One request exactly as the connection received it.
#[derive(Debug, Clone, PartialEq)]
pub struct SentRequest {
    pub url_path: String,
    pub http_method: HttpMethod,
    pub body_params: Option<Map<String, Value>>,
    pub path_params: Option<Map<String, Value>>,
    pub query_params: Option<Map<String, Value>>,
}

/// Scripted connection: canned specs, queued responses, recorded requests.
///
/// Responses are consumed first-in-first-out; once the queue is empty every
/// further request gets a `200` with an empty object body. Validation knobs
/// reject one category with a fixed detail, independent of the operation.
#[derive(Default)]
pub struct FakeConnection {
    specs: HashMap<String, OperationSpec>,
    model_specs: HashMap<String, HashMap<String, OperationSpec>>,
    responses: RefCell<VecDeque<ResponseEnvelope>>,
    requests: RefCell<Vec<SentRequest>>,
    spec_fetches: RefCell<Vec<String>>,
    model_fetches: RefCell<Vec<String>>,
    invalid_query_params: Option<Value>,
    invalid_path_params: Option<Value>,
    invalid_data: Option<Value>,
}

impl FakeConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spec under its own operation name.
    pub fn with_spec(mut self, spec: OperationSpec) -> Self {
        self.specs.insert(spec.name.clone(), spec);
        self
    }

    /// Register the batch of specs a model lookup returns.
    pub fn with_model_specs(
        mut self,
        model_name: &str,
        specs: impl IntoIterator<Item = OperationSpec>,
    ) -> Self {
        let batch = specs
            .into_iter()
            .map(|spec| (spec.name.clone(), spec))
            .collect();
        self.model_specs.insert(model_name.to_string(), batch);
        self
    }

    /// Queue the next response envelope.
    pub fn respond(self, envelope: ResponseEnvelope) -> Self {
        self.responses.borrow_mut().push_back(envelope);
        self
    }

    /// Queue a successful response with the given body.
    pub fn respond_ok(self, body: Value) -> Self {
        self.respond(ResponseEnvelope::ok(body))
    }

    /// Queue a failed response.
    pub fn respond_error(self, status_code: u16, body: Value) -> Self {
        self.respond(ResponseEnvelope::error(status_code, body))
    }

    /// Make query-parameter validation fail with the given detail.
    pub fn reject_query_params(mut self, detail: Value) -> Self {
        self.invalid_query_params = Some(detail);
        self
    }

    /// Make path-parameter validation fail with the given detail.
    pub fn reject_path_params(mut self, detail: Value) -> Self {
        self.invalid_path_params = Some(detail);
        self
    }

    /// Make body validation fail with the given detail.
    pub fn reject_data(mut self, detail: Value) -> Self {
        self.invalid_data = Some(detail);
        self
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<SentRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Operation names fetched from the metadata source, in order.
    pub fn spec_fetches(&self) -> Vec<String> {
        self.spec_fetches.borrow().clone()
    }

    /// Model names fetched from the metadata source, in order.
    pub fn model_fetches(&self) -> Vec<String> {
        self.model_fetches.borrow().clone()
    }
}

impl ApiConnection for FakeConnection {
    fn get_operation_spec(&self, operation_name: &str) -> Option<OperationSpec> {
        self.spec_fetches
            .borrow_mut()
            .push(operation_name.to_string());
        self.specs.get(operation_name).cloned()
    }

    fn get_operation_specs_by_model_name(
        &self,
        model_name: &str,
    ) -> HashMap<String, OperationSpec> {
        self.model_fetches.borrow_mut().push(model_name.to_string());
        self.model_specs.get(model_name).cloned().unwrap_or_default()
    }

    fn send_request(
        &self,
        url_path: &str,
        http_method: HttpMethod,
        body_params: Option<&Map<String, Value>>,
        path_params: Option<&Map<String, Value>>,
        query_params: Option<&Map<String, Value>>,
    ) -> ResponseEnvelope {
        self.requests.borrow_mut().push(SentRequest {
            url_path: url_path.to_string(),
            http_method,
            body_params: body_params.cloned(),
            path_params: path_params.cloned(),
            query_params: query_params.cloned(),
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| ResponseEnvelope::ok(json!({})))
    }

    fn validate_query_params(
        &self,
        _operation_name: &str,
        _params: &Map<String, Value>,
    ) -> Result<(), Value> {
        match &self.invalid_query_params {
            Some(detail) => Err(detail.clone()),
            None => Ok(()),
        }
    }

    fn validate_path_params(
        &self,
        _operation_name: &str,
        _params: &Map<String, Value>,
    ) -> Result<(), Value> {
        match &self.invalid_path_params {
            Some(detail) => Err(detail.clone()),
            None => Ok(()),
        }
    }

    fn validate_data(
        &self,
        _operation_name: &str,
        _params: &Map<String, Value>,
    ) -> Result<(), Value> {
        match &self.invalid_data {
            Some(detail) => Err(detail.clone()),
            None => Ok(()),
        }
    }
}

/// Shorthand for building a `Map` from a `json!` object literal.
pub fn object(value: Value) -> Map<String, Value> {
    value
        .as_object()
        .cloned()
        .expect("test value must be a JSON object")
}

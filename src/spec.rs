//! Operation metadata: specifications, classification, and the spec cache.
//!
//! An [`OperationSpec`] is the engine's entire knowledge of a server operation:
//! its name, URL template, HTTP method, and owning model. Specs come from the
//! connection's metadata source and are memoized per resource instance by
//! [`SpecCache`], including negative answers.
//!
//! # Key Types
//!
//! - [`OperationSpec`] - immutable description of one named operation
//! - [`HttpMethod`] - the method an operation is bound to
//! - [`OperationKind`] - semantic category used for dispatch

use crate::params::RequestParams;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

const ADD_PREFIX: &str = "add";
const EDIT_PREFIX: &str = "edit";
const DELETE_PREFIX: &str = "delete";
const GET_PREFIX: &str = "get";
const LIST_SUFFIX: &str = "List";

/// HTTP method an operation is bound to.
///
/// `Patch` never classifies as a CRUD category; operations using it dispatch
/// as [`OperationKind::General`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Canonical uppercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// True for methods that never mutate server state.
    ///
    /// Read-only requests bypass the check-mode gate and never flip the
    /// configuration-changed flag.
    pub fn is_read_only(&self) -> bool {
        matches!(self, HttpMethod::Get)
    }

    /// True for methods whose request body is subject to data validation.
    pub(crate) fn validates_data(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unsupported HTTP method name.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unsupported HTTP method '{0}'")]
pub struct UnsupportedMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            _ => Err(UnsupportedMethod(s.to_string())),
        }
    }
}

/// Semantic category of an operation, used for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Create a new object (POST).
    Add,
    /// Replace an existing object (PUT).
    Edit,
    /// Remove an object (DELETE).
    Delete,
    /// List every object of a model (GET, no client-side filters supplied).
    FindAll,
    /// List objects of a model and filter them client-side.
    FindByFilter,
    /// Anything else; passed through verbatim.
    General,
}

/// Immutable description of one named server operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationSpec {
    /// Operation name as published by the metadata source, e.g. `addNetworkObject`.
    pub name: String,
    /// URL template with `{placeholders}` for path parameters.
    pub url: String,
    /// HTTP method the operation is bound to.
    pub method: HttpMethod,
    /// Name of the model the operation acts on, when the metadata declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl OperationSpec {
    /// Create a spec without a model name.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        method: HttpMethod,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            method,
            model_name: None,
        }
    }

    /// Attach the owning model name.
    pub fn for_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    // Name prefixes alone are ambiguous: endpoints expose non-CRUD actions that
    // reuse a verb (e.g. an "addDownload" GET), so every predicate checks the
    // method as well.

    /// True for create operations.
    pub fn is_add_operation(&self) -> bool {
        self.name.starts_with(ADD_PREFIX) && self.method == HttpMethod::Post
    }

    /// True for replace operations.
    pub fn is_edit_operation(&self) -> bool {
        self.name.starts_with(EDIT_PREFIX) && self.method == HttpMethod::Put
    }

    /// True for remove operations.
    pub fn is_delete_operation(&self) -> bool {
        self.name.starts_with(DELETE_PREFIX) && self.method == HttpMethod::Delete
    }

    /// True for list operations, the ones the pagination iterator understands.
    pub fn is_find_all_operation(&self) -> bool {
        self.name.starts_with(GET_PREFIX)
            && self.name.ends_with(LIST_SUFFIX)
            && self.method == HttpMethod::Get
    }

    /// Classify this operation for the given call parameters.
    ///
    /// A list operation becomes [`OperationKind::FindByFilter`] only when the
    /// caller supplied a non-empty `filters` map; filtering is client-side, so
    /// without filters there is nothing for the engine to add over a plain
    /// pass-through request.
    pub fn kind(&self, params: &RequestParams) -> OperationKind {
        if self.is_add_operation() {
            OperationKind::Add
        } else if self.is_edit_operation() {
            OperationKind::Edit
        } else if self.is_delete_operation() {
            OperationKind::Delete
        } else if self.is_find_all_operation() {
            if params.filters.is_empty() {
                OperationKind::FindAll
            } else {
                OperationKind::FindByFilter
            }
        } else {
            OperationKind::General
        }
    }
}

/// Two-level memo of operation specifications.
///
/// The name-keyed level caches single lookups, including `None` for names the
/// metadata source does not know. The model-keyed level caches batch lookups
/// and backfills the name-keyed level without overwriting entries already
/// present, so repeated reconciliations never refetch metadata.
///
/// Interior mutability keeps lookups usable behind `&self`; the cache is not
/// thread-safe, matching the engine's single-threaded contract.
#[derive(Debug, Default)]
pub(crate) struct SpecCache {
    by_name: RefCell<HashMap<String, Option<OperationSpec>>>,
    by_model: RefCell<HashMap<String, HashMap<String, OperationSpec>>>,
}

impl SpecCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Spec for `name`, calling `fetch` once on a miss.
    pub(crate) fn spec_by_name(
        &self,
        name: &str,
        fetch: impl FnOnce(&str) -> Option<OperationSpec>,
    ) -> Option<OperationSpec> {
        if let Some(cached) = self.by_name.borrow().get(name) {
            return cached.clone();
        }
        let fetched = fetch(name);
        self.by_name
            .borrow_mut()
            .insert(name.to_string(), fetched.clone());
        fetched
    }

    /// All specs owned by `model`, calling `fetch` once on a miss.
    pub(crate) fn specs_by_model(
        &self,
        model: &str,
        fetch: impl FnOnce(&str) -> HashMap<String, OperationSpec>,
    ) -> HashMap<String, OperationSpec> {
        if let Some(cached) = self.by_model.borrow().get(model) {
            return cached.clone();
        }
        let fetched = fetch(model);
        {
            let mut by_name = self.by_name.borrow_mut();
            for (op_name, op_spec) in &fetched {
                by_name
                    .entry(op_name.clone())
                    .or_insert_with(|| Some(op_spec.clone()));
            }
        }
        self.by_model
            .borrow_mut()
            .insert(model.to_string(), fetched.clone());
        fetched
    }
}

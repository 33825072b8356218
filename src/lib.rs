//! Declarative, idempotent CRUD engine for model-driven REST APIs.
//!
//! Maps a small set of named operations (add/edit/delete/find) onto a REST
//! backend described by operation metadata, and hides the backend quirks that
//! break declarative callers: duplicate-create rejections and
//! already-deleted targets reconcile into idempotent outcomes, list endpoints
//! paginate transparently for client-side filtering, parameters are validated
//! before any request is sent, and a check mode aborts mutations after
//! validation but before transmission.
//!
//! # Core Components
//!
//! - [`ConfigResource`] - the operation engine, one instance per backend session
//! - [`ApiConnection`] - trait for the host's transport and metadata layer
//! - [`OperationOutcome`] - flattened result returned by [`ConfigResource::perform`]
//!
//! # Quick Start
//!
//! ```rust
//! use declarest::{
//!     ApiConnection, ConfigResource, HttpMethod, OperationSpec, RequestParams,
//!     ResponseEnvelope,
//! };
//! use serde_json::{Map, Value, json};
//! use std::collections::HashMap;
//!
//! struct Device;
//!
//! impl ApiConnection for Device {
//!     fn get_operation_spec(&self, operation_name: &str) -> Option<OperationSpec> {
//!         (operation_name == "addHost").then(|| {
//!             OperationSpec::new("addHost", "/object/hosts", HttpMethod::Post)
//!                 .for_model("Host")
//!         })
//!     }
//!
//!     fn get_operation_specs_by_model_name(
//!         &self,
//!         _model_name: &str,
//!     ) -> HashMap<String, OperationSpec> {
//!         HashMap::new()
//!     }
//!
//!     fn send_request(
//!         &self,
//!         _url_path: &str,
//!         _http_method: HttpMethod,
//!         body_params: Option<&Map<String, Value>>,
//!         _path_params: Option<&Map<String, Value>>,
//!         _query_params: Option<&Map<String, Value>>,
//!     ) -> ResponseEnvelope {
//!         let mut created = body_params.cloned().unwrap_or_default();
//!         created.insert("id".to_string(), json!("8d4f06ee"));
//!         ResponseEnvelope::ok(Value::Object(created))
//!     }
//!
//!     fn validate_query_params(&self, _: &str, _: &Map<String, Value>) -> Result<(), Value> {
//!         Ok(())
//!     }
//!     fn validate_path_params(&self, _: &str, _: &Map<String, Value>) -> Result<(), Value> {
//!         Ok(())
//!     }
//!     fn validate_data(&self, _: &str, _: &Map<String, Value>) -> Result<(), Value> {
//!         Ok(())
//!     }
//! }
//!
//! let resource = ConfigResource::new(Device);
//! let params = RequestParams::new()
//!     .with_data(json!({"name": "dmz-host", "value": "10.1.1.1"}).as_object().cloned().unwrap());
//!
//! let outcome = resource.perform("addHost", &params);
//! assert!(outcome.is_success());
//! assert!(resource.config_changed());
//! ```
//!
//! Operation names classify by prefix and method the way model-driven APIs
//! publish them: `addX` (POST), `editX` (PUT), `deleteX` (DELETE), and
//! `getXList` (GET) with optional client-side `filters`; everything else is
//! passed through verbatim.

pub mod compare;
pub mod connection;
pub mod error;
pub mod params;
pub mod resource;
pub mod spec;

// Re-export commonly used types for convenience
pub use compare::objects_equal;
pub use connection::{ApiConnection, ResponseEnvelope};
pub use error::{OperationError, OperationResult, ValidationReport};
pub use params::RequestParams;
pub use resource::{ConfigResource, OperationOutcome};
pub use spec::{HttpMethod, OperationKind, OperationSpec, UnsupportedMethod};

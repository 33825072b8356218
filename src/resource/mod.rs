//! Operation dispatch, idempotency reconciliation, and pagination.
//!
//! This module is the engine proper. [`ConfigResource`] wraps a connection
//! collaborator and exposes the declarative operation surface: a host hands
//! it an operation name plus [`RequestParams`] and gets an
//! [`OperationOutcome`] back, with duplicate creates and already-gone deletes
//! reconciled into idempotent successes along the way.
//!
//! # Key Types
//!
//! - [`ConfigResource`] - the engine, one instance per backend session
//! - [`OperationOutcome`] - flattened result of a `perform` call
//!
//! # Examples
//!
//! ```rust,no_run
//! use declarest::{ConfigResource, RequestParams};
//! use serde_json::json;
//!
//! # fn example(conn: impl declarest::ApiConnection) {
//! let resource = ConfigResource::new(conn).check_mode(false);
//!
//! let params = RequestParams::new()
//!     .with_data(json!({"name": "dmz-host", "value": "10.1.1.1"}).as_object().cloned().unwrap());
//! let outcome = resource.perform("addNetworkObject", &params);
//! assert!(outcome.is_success());
//! # }
//! ```
//!
//! [`RequestParams`]: crate::params::RequestParams

mod core;
mod crud;
mod outcome;
mod paging;
mod query;
mod validate;

pub use core::ConfigResource;
pub use outcome::OperationOutcome;

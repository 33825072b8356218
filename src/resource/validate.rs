//! Parameter validation aggregation.
//!
//! Field-level validation lives behind the connection collaborator; this
//! module only decides which categories apply and folds the failures into one
//! [`ValidationReport`] so a caller sees every broken category at once instead
//! of fixing them one request at a time.

use crate::connection::ApiConnection;
use crate::error::{OperationError, OperationResult, ValidationReport};
use crate::params::RequestParams;
use crate::resource::core::ConfigResource;
use crate::spec::OperationSpec;
use log::warn;
use serde_json::Value;

impl<C: ApiConnection> ConfigResource<C> {
    /// Validate every category that applies to the operation.
    ///
    /// Query and path parameters are always checked; the body only when the
    /// operation's method carries one (POST/PUT). A failing category never
    /// short-circuits the others.
    pub(super) fn validate_params(
        &self,
        spec: &OperationSpec,
        params: &RequestParams,
    ) -> OperationResult<()> {
        let conn = self.connection();
        let mut report = ValidationReport::new();
        let mut record = |category: &str, result: Result<(), Value>| {
            if let Err(detail) = result {
                report.insert(format!("Invalid {category} provided"), detail);
            }
        };

        record(
            "query_params",
            conn.validate_query_params(&spec.name, &params.query_params),
        );
        record(
            "path_params",
            conn.validate_path_params(&spec.name, &params.path_params),
        );
        if spec.method.validates_data() {
            record("data", conn.validate_data(&spec.name, &params.data));
        }

        if report.is_empty() {
            Ok(())
        } else {
            warn!("validation for operation '{}' failed: {}", spec.name, report);
            Err(OperationError::Validation(report))
        }
    }
}

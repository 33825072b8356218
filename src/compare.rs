//! Deep subset comparison between a server-side object and desired fields.
//!
//! Reconciliation needs to decide whether an object already on the server
//! satisfies the configuration a caller submitted. Servers decorate stored
//! objects with generated fields (ids, versions, links), so plain equality is
//! useless; instead the desired fields are compared as a deep subset of the
//! existing object and everything else on the existing side is ignored.

use serde_json::{Map, Value};

/// True when every desired field is present in `existing` with a matching value.
///
/// Matching is structural: nested objects are compared as subsets again,
/// arrays must match element-wise in order and length, and a `null` desired
/// value accepts an absent field. Fields only the server knows about never
/// affect the result.
pub fn objects_equal(existing: &Value, desired: &Map<String, Value>) -> bool {
    desired
        .iter()
        .all(|(key, want)| field_matches(existing.get(key), want))
}

fn field_matches(have: Option<&Value>, want: &Value) -> bool {
    match (have, want) {
        (None, Value::Null) => true,
        (None, _) => false,
        (Some(have), want) => value_matches(have, want),
    }
}

fn value_matches(have: &Value, want: &Value) -> bool {
    match want {
        Value::Object(want_fields) => objects_equal(have, want_fields),
        Value::Array(want_items) => match have.as_array() {
            Some(have_items) => {
                have_items.len() == want_items.len()
                    && have_items
                        .iter()
                        .zip(want_items)
                        .all(|(h, w)| value_matches(h, w))
            }
            None => false,
        },
        scalar => have == scalar,
    }
}

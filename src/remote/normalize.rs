//! Response shape normalization.
//!
//! The search service answers single-match queries with a bare organ object
//! and multi-match queries with an array of organ objects. This module folds
//! both shapes into one canonical `Vec<OrganRecord>` so nothing downstream
//! has to care which shape arrived.

use crate::domain::{MeridianError, OrganRecord, Result};
use serde_json::Value;

/// Converts a decoded search response into an ordered list of organ records.
///
/// - An array parses element by element, preserving order; an empty array is
///   a valid empty result, not an error.
/// - A single object parses as one record and is wrapped in a one-element
///   list.
/// - Any other JSON type fails with [`MeridianError::MalformedResponse`]
///   carrying the offending type name.
///
/// # Errors
///
/// Returns `MalformedResponse` for non-object, non-array input, and for any
/// element that does not match the organ record shape.
pub fn normalize_response(value: Value) -> Result<Vec<OrganRecord>> {
    match value {
        Value::Array(elements) => {
            tracing::debug!(element_count = elements.len(), "normalizing array response");
            elements.into_iter().map(parse_record).collect()
        }
        value @ Value::Object(_) => {
            tracing::debug!("normalizing single-object response");
            parse_record(value).map(|record| vec![record])
        }
        other => Err(MeridianError::MalformedResponse(format!(
            "unexpected JSON type: {}",
            json_type_name(&other)
        ))),
    }
}

fn parse_record(value: Value) -> Result<OrganRecord> {
    serde_json::from_value(value)
        .map_err(|e| MeridianError::MalformedResponse(format!("invalid organ record: {e}")))
}

/// Returns the JSON type name used in malformed-response diagnostics.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

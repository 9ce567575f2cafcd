//! Adapter between schema-agnostic transparency entries and typed log entries
//!
//! Attestations carry log entries as plain JSON objects, bundles carry them as
//! typed messages. The two directions are JSON text round trips, so the typed
//! side's projection rules decide what survives: unknown keys are dropped on
//! the way in, and only recognised, non-default fields come back out.

use pep740_types::{StructuredValue, TransparencyLogEntry};
use serde_json::Value;
use thiserror::Error;

/// Failure converting a single transparency entry
#[derive(Debug, Error)]
pub enum TlogError {
    #[error("failed to serialize transparency entry: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("transparency entry does not match the log entry schema: {0}")]
    Schema(#[source] serde_json::Error),

    #[error("transparency entry serialized to {0}, expected an object")]
    NotAnObject(&'static str),
}

/// Convert a generic JSON object into a typed log entry
pub fn transparency_entry_from_value(
    value: &StructuredValue,
) -> Result<TransparencyLogEntry, TlogError> {
    let json = serde_json::to_vec(value).map_err(TlogError::Serialize)?;
    serde_json::from_slice(&json).map_err(TlogError::Schema)
}

/// Convert a typed log entry into a generic JSON object
pub fn transparency_entry_to_value(
    entry: &TransparencyLogEntry,
) -> Result<StructuredValue, TlogError> {
    let json = serde_json::to_vec(entry).map_err(TlogError::Serialize)?;
    match serde_json::from_slice(&json).map_err(TlogError::Schema)? {
        Value::Object(map) => Ok(map),
        other => Err(TlogError::NotAnObject(kind(&other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

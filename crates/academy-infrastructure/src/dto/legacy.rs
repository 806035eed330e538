//! Helpers for reading the loosely typed records written before schema
//! versioning.
//!
//! Ids were either numbers (`Date.now()`) or strings, and group references
//! were either numeric ids or group names. Both are kept as their string
//! form; a group name therefore becomes the group id it references.

use serde_json::Value;
use uuid::Uuid;

use academy_core::entity::GroupRef;

/// Version assumed for documents without a `version` field.
pub const LEGACY_VERSION: &str = "1.0.0";

/// String form of a legacy id, or `None` when absent or blank.
pub fn legacy_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Object(obj) => obj.get("id").and_then(legacy_id),
        _ => None,
    }
}

/// Stable id for a record stored without one.
///
/// Derived from the collection, the record's position and its stored text,
/// so repeated reads of an unchanged collection agree on it.
pub fn derived_id(entity: &str, index: usize, record: &str) -> String {
    let seed = format!("{}:{}:{}", entity, index, record);
    Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes()).to_string()
}

/// A single legacy group reference.
pub fn legacy_ref(value: &Value) -> Option<GroupRef> {
    legacy_id(value).map(GroupRef::new)
}

/// A list of legacy group references; a lone scalar counts as a list of one.
pub fn legacy_refs(value: &Value) -> Vec<GroupRef> {
    match value {
        Value::Array(items) => items.iter().filter_map(legacy_ref).collect(),
        other => legacy_ref(other).into_iter().collect(),
    }
}

/// Text stored either as a string or as a number.
pub fn legacy_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Leading unsigned integer of a number or a string such as `"7 years"`.
pub fn legacy_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

/// Tags a stored record with [`LEGACY_VERSION`] when it has no version.
pub fn ensure_version(mut value: Value) -> Value {
    if let Value::Object(obj) = &mut value {
        if !obj.contains_key("version") {
            obj.insert(
                "version".to_string(),
                Value::String(LEGACY_VERSION.to_string()),
            );
        }
    }
    value
}

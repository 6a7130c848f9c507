#![forbid(unsafe_code)]

use serde_json::Value;

pub(super) fn items_mut(payload: &mut Value) -> Result<&mut Vec<Value>, &'static str> {
    payload
        .get_mut("items")
        .and_then(Value::as_array_mut)
        .ok_or("payload items must be an array")
}

/// Move a non-empty string out of a legacy field into the canonical one when
/// the canonical field is absent or empty; the legacy key is removed either
/// way.
pub(super) fn fold_legacy_string(item: &mut Value, legacy: &str, canonical: &str) {
    let Some(object) = item.as_object_mut() else {
        return;
    };
    let legacy_value = object.remove(legacy);
    let canonical_empty = match object.get(canonical) {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    };
    if canonical_empty
        && let Some(Value::String(text)) = legacy_value
        && !text.trim().is_empty()
    {
        object.insert(canonical.to_string(), Value::String(text));
    }
}

pub(super) fn ensure_array_field(item: &mut Value, field: &str) {
    if let Some(object) = item.as_object_mut()
        && !matches!(object.get(field), Some(Value::Array(_)))
    {
        object.insert(field.to_string(), Value::Array(Vec::new()));
    }
}

/// Rename a field, keeping an existing value under the new name if both are
/// present.
pub(super) fn rename_field(item: &mut Value, from: &str, to: &str) {
    if let Some(object) = item.as_object_mut()
        && let Some(value) = object.remove(from)
        && !object.contains_key(to)
    {
        object.insert(to.to_string(), value);
    }
}

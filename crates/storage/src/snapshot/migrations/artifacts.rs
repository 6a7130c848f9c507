#![forbid(unsafe_code)]

use super::Step;
use super::util::{fold_legacy_string, items_mut};
use serde_json::Value;

pub(super) const STEPS: &[Step] = &[Step {
    to_version: 2,
    apply: canonicalize_legacy_fields,
}];

/// v1 artifacts carried a `compliance_requirement` string and linked
/// subcategories directly. The control link is canonical now; the legacy
/// subcategory list has no canonical counterpart and is dropped.
fn canonicalize_legacy_fields(payload: &mut Value) -> Result<(), &'static str> {
    for item in items_mut(payload)? {
        fold_legacy_string(item, "compliance_requirement", "control_id");
        if let Some(object) = item.as_object_mut() {
            object.remove("linked_subcategory_ids");
        }
    }
    Ok(())
}

#![forbid(unsafe_code)]

use super::Step;
use super::util::{ensure_array_field, items_mut, rename_field};
use serde_json::Value;

pub(super) const STEPS: &[Step] = &[
    Step {
        to_version: 2,
        apply: add_stakeholders,
    },
    Step {
        to_version: 3,
        apply: rename_linked_requirements,
    },
];

/// v1 controls predate stakeholder tracking; patch every record with an
/// empty list rather than reseeding.
fn add_stakeholders(payload: &mut Value) -> Result<(), &'static str> {
    for item in items_mut(payload)? {
        ensure_array_field(item, "stakeholder_ids");
    }
    Ok(())
}

/// v2 stored control/requirement links under the legacy subcategory name.
fn rename_linked_requirements(payload: &mut Value) -> Result<(), &'static str> {
    for item in items_mut(payload)? {
        rename_field(item, "linked_subcategory_ids", "linked_requirement_ids");
        ensure_array_field(item, "linked_requirement_ids");
    }
    Ok(())
}

#![forbid(unsafe_code)]

use super::Step;
use super::util::items_mut;
use serde_json::Value;

pub(super) const STEPS: &[Step] = &[Step {
    to_version: 2,
    apply: canonicalize_control_link,
}];

/// Findings keep `compliance_requirement` for the Jira export column, but
/// the control link is canonical: copy the legacy text into `control_id`
/// when no explicit link exists.
fn canonicalize_control_link(payload: &mut Value) -> Result<(), &'static str> {
    for item in items_mut(payload)? {
        let Some(object) = item.as_object_mut() else {
            continue;
        };
        let control_empty = match object.get("control_id") {
            None | Some(Value::Null) => true,
            Some(Value::String(text)) => text.trim().is_empty(),
            Some(_) => false,
        };
        if control_empty
            && let Some(Value::String(text)) = object.get("compliance_requirement")
            && !text.trim().is_empty()
        {
            let text = text.clone();
            object.insert("control_id".to_string(), Value::String(text));
        }
    }
    Ok(())
}

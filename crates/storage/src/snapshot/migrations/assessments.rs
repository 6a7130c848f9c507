#![forbid(unsafe_code)]

use super::Step;
use super::util::items_mut;
use serde_json::{Value, json};

pub(super) const STEPS: &[Step] = &[Step {
    to_version: 2,
    apply: normalize_quarters,
}];

/// v1 observations stored quarters as an object keyed "Q1".."Q4" and could
/// omit untouched quarters. The current shape is a fixed four-slot array, so
/// every observation gets exactly Q1..Q4 with NotStarted defaults filling
/// the gaps.
fn normalize_quarters(payload: &mut Value) -> Result<(), &'static str> {
    for item in items_mut(payload)? {
        let Some(observations) = item
            .get_mut("observations")
            .and_then(Value::as_object_mut)
        else {
            continue;
        };
        for observation in observations.values_mut() {
            let Some(object) = observation.as_object_mut() else {
                continue;
            };
            let quarters = object.remove("quarters");
            object.insert("quarters".to_string(), four_slots(quarters));
        }
    }
    Ok(())
}

fn four_slots(quarters: Option<Value>) -> Value {
    match quarters {
        Some(Value::Array(mut slots)) => {
            slots.truncate(4);
            while slots.len() < 4 {
                slots.push(json!({}));
            }
            Value::Array(slots)
        }
        Some(Value::Object(by_label)) => Value::Array(
            ["Q1", "Q2", "Q3", "Q4"]
                .iter()
                .map(|label| by_label.get(*label).cloned().unwrap_or_else(|| json!({})))
                .collect(),
        ),
        _ => Value::Array(vec![json!({}), json!({}), json!({}), json!({})]),
    }
}

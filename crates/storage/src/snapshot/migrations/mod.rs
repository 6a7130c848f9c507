#![forbid(unsafe_code)]

mod artifacts;
mod assessments;
mod controls;
mod findings;
mod util;

use serde_json::Value;

/// One version transition. Steps run in order; each handles exactly one
/// `to_version` so a v1 payload reaching a v4 store applies v2, v3 and v4 in
/// sequence rather than jumping.
pub(crate) struct Step {
    pub to_version: i64,
    pub apply: fn(&mut Value) -> Result<(), &'static str>,
}

pub(crate) fn chain_for(store: &str) -> &'static [Step] {
    match store {
        "controls" => controls::STEPS,
        "assessments" => assessments::STEPS,
        "artifacts" => artifacts::STEPS,
        "findings" => findings::STEPS,
        _ => &[],
    }
}

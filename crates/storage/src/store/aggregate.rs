#![forbid(unsafe_code)]

use super::Tracker;
use super::support::dedupe_preserving_order;
use ct_core::{Artifact, Control, Finding, Requirement};

/// Read-side view of one Requirement through its linked Controls. Produced
/// fresh on every call; folding is idempotent and order-stable so repeated
/// renders never flap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequirementRollup {
    pub implementation: String,
    pub owner_names: Vec<String>,
    pub stakeholder_names: Vec<String>,
    pub artifact_ids: Vec<String>,
    pub finding_ids: Vec<String>,
}

impl Tracker {
    /// Controls that explicitly link this requirement. The inverse direction
    /// is never stored; it is always computed here.
    pub fn controls_for_requirement(&self, requirement_id: &str) -> Vec<&Control> {
        self.controls()
            .iter()
            .filter(|control| {
                control
                    .linked_requirement_ids
                    .iter()
                    .any(|id| id == requirement_id)
            })
            .collect()
    }

    /// Requirements a control links to, with dangling ids filtered.
    pub fn requirements_for_control(&self, control_id: &str) -> Vec<&Requirement> {
        let Some(control) = self.control(control_id) else {
            return Vec::new();
        };
        control
            .linked_requirement_ids
            .iter()
            .filter_map(|id| self.requirement(id))
            .collect()
    }

    pub fn artifacts_for_control(&self, control_id: &str) -> Vec<&Artifact> {
        self.artifacts()
            .iter()
            .filter(|artifact| artifact.control_id.as_deref() == Some(control_id))
            .collect()
    }

    pub fn findings_for_control(&self, control_id: &str) -> Vec<&Finding> {
        self.findings()
            .iter()
            .filter(|finding| finding.control_id.as_deref() == Some(control_id))
            .collect()
    }

    /// Fold zero, one, or many linked Controls into the Requirements view.
    /// Zero linked controls falls back to a control whose `control_id`
    /// literally equals the requirement id, a legacy 1:1 naming convention
    /// kept for data predating explicit links.
    pub fn requirement_rollup(&self, requirement_id: &str) -> RequirementRollup {
        let mut linked = self.controls_for_requirement(requirement_id);
        if linked.is_empty()
            && let Some(control) = self.control(requirement_id)
        {
            linked.push(control);
        }

        let mut rollup = RequirementRollup::default();
        let mut descriptions = Vec::new();
        for control in &linked {
            if !control.implementation_description.trim().is_empty() {
                descriptions.push(control.implementation_description.clone());
            }
            let owner = self.user_display(control.owner_id.as_ref());
            if control.owner_id.is_some() {
                rollup.owner_names.push(owner);
            }
            for stakeholder in &control.stakeholder_ids {
                rollup
                    .stakeholder_names
                    .push(self.user_display(Some(stakeholder)));
            }
            for artifact in self.artifacts_for_control(&control.control_id) {
                rollup.artifact_ids.push(artifact.id.clone());
            }
            for finding in self.findings_for_control(&control.control_id) {
                rollup.finding_ids.push(finding.id.clone());
            }
        }

        dedupe_preserving_order(&mut descriptions);
        rollup.implementation = descriptions.join(" | ");
        dedupe_preserving_order(&mut rollup.owner_names);
        dedupe_preserving_order(&mut rollup.stakeholder_names);
        dedupe_preserving_order(&mut rollup.artifact_ids);
        dedupe_preserving_order(&mut rollup.finding_ids);
        rollup
    }
}

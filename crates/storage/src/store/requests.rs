#![forbid(unsafe_code)]

use ct_core::{ScopeType, TestingStatus};

/// Owner/stakeholder/auditor fields on requests are free-text identity
/// strings ("Name <email>", bare email, or bare name); the engine resolves
/// them to stable user references on the way in. A blank string clears the
/// field.
#[derive(Clone, Debug, Default)]
pub struct ControlCreateRequest {
    pub control_id: String,
    pub implementation_description: String,
    pub owner: Option<String>,
    pub stakeholders: Vec<String>,
    pub linked_requirement_ids: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ControlPatch {
    pub implementation_description: Option<String>,
    pub owner: Option<String>,
    pub stakeholders: Option<Vec<String>>,
    pub linked_requirement_ids: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default)]
pub struct AssessmentCreateRequest {
    pub name: String,
    pub description: String,
    pub scope_type: ScopeType,
}

#[derive(Clone, Debug, Default)]
pub struct AssessmentPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ObservationPatch {
    pub auditor: Option<String>,
    pub test_procedures: Option<String>,
    pub linked_artifacts: Option<Vec<String>>,
    pub remediation_owner: Option<String>,
    pub action_plan: Option<String>,
    pub due_date: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct QuarterPatch {
    pub actual_score: Option<f64>,
    pub target_score: Option<f64>,
    pub observations: Option<String>,
    pub observation_date: Option<String>,
    pub testing_status: Option<TestingStatus>,
    pub examine: Option<bool>,
    pub interview: Option<bool>,
    pub test: Option<bool>,
}

#[derive(Clone, Debug, Default)]
pub struct ArtifactCreateRequest {
    pub artifact_id: Option<String>,
    pub name: String,
    pub description: String,
    pub link: String,
    pub artifact_type: String,
    pub control_id: Option<String>,
    pub linked_evaluation_ids: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ArtifactPatch {
    pub artifact_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub artifact_type: Option<String>,
    pub control_id: Option<Option<String>>,
    pub linked_evaluation_ids: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default)]
pub struct FindingCreateRequest {
    pub summary: String,
    pub control_id: Option<String>,
    pub compliance_requirement: Option<String>,
    pub root_cause: String,
    pub remediation_action_plan: String,
    pub remediation_owner: Option<String>,
    pub due_date: String,
    pub status: String,
    pub priority: String,
    pub linked_artifacts: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct FindingPatch {
    pub summary: Option<String>,
    pub control_id: Option<Option<String>>,
    pub root_cause: Option<String>,
    pub remediation_action_plan: Option<String>,
    pub remediation_owner: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub linked_artifacts: Option<Vec<String>>,
}

/// Import paths report what landed and what was skipped instead of aborting
/// on a single bad row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CsvImportReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Progress of one assessment against a single quarter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub percentage: u32,
}

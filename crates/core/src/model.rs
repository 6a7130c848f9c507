#![forbid(unsafe_code)]

use crate::quarter::Quarter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable reference to a user record. Users are created implicitly by
/// identity resolution and never deleted; dangling references are read back
/// as the "Unassigned" placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: UserId::new(""),
            name: String::new(),
            email: None,
        }
    }
}

/// Framework-provided reference record. Only `in_scope` is user-editable;
/// everything else is read-only catalog data replaced wholesale on re-import.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirement {
    pub id: String,
    pub framework_id: String,
    pub function: String,
    pub category: String,
    pub category_id: String,
    pub subcategory_id: String,
    pub subcategory_description: String,
    pub implementation_example: String,
    pub in_scope: bool,
}

/// User-authored control. `control_id` is the user-chosen unique external
/// key exported to CSV/Jira and matched on re-import.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Control {
    pub control_id: String,
    pub implementation_description: String,
    pub owner_id: Option<UserId>,
    pub stakeholder_ids: Vec<UserId>,
    pub linked_requirement_ids: Vec<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScopeType {
    #[default]
    #[serde(rename = "controls")]
    Controls,
    #[serde(rename = "requirements")]
    Requirements,
}

impl ScopeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeType::Controls => "controls",
            ScopeType::Requirements => "requirements",
        }
    }

    pub fn parse(value: &str) -> Option<ScopeType> {
        match value.trim().to_ascii_lowercase().as_str() {
            "controls" => Some(ScopeType::Controls),
            "requirements" => Some(ScopeType::Requirements),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestingStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Submitted")]
    Submitted,
    #[serde(rename = "Complete")]
    Complete,
}

impl TestingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TestingStatus::NotStarted => "Not Started",
            TestingStatus::InProgress => "In Progress",
            TestingStatus::Submitted => "Submitted",
            TestingStatus::Complete => "Complete",
        }
    }

    /// Lenient parse used by CSV import; unknown text reads as NotStarted so
    /// a malformed status cell never fails a row.
    pub fn parse(value: &str) -> TestingStatus {
        match value.trim() {
            "In Progress" => TestingStatus::InProgress,
            "Submitted" => TestingStatus::Submitted,
            "Complete" => TestingStatus::Complete,
            _ => TestingStatus::NotStarted,
        }
    }
}

/// Per-quarter score/status slice of an Observation. An empty record always
/// reports NotStarted, which is what progress accounting keys on.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuarterRecord {
    pub actual_score: f64,
    pub target_score: f64,
    pub observations: String,
    pub observation_date: String,
    pub testing_status: TestingStatus,
    pub examine: bool,
    pub interview: bool,
    pub test: bool,
}

impl QuarterRecord {
    pub fn is_assessed(&self) -> bool {
        self.testing_status != TestingStatus::NotStarted
    }
}

/// Exactly four quarter slots, always present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quarters([QuarterRecord; 4]);

impl Default for Quarters {
    fn default() -> Self {
        Self(std::array::from_fn(|_| QuarterRecord::default()))
    }
}

impl Quarters {
    pub fn get(&self, quarter: Quarter) -> &QuarterRecord {
        &self.0[quarter.index()]
    }

    pub fn get_mut(&mut self, quarter: Quarter) -> &mut QuarterRecord {
        &mut self.0[quarter.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quarter, &QuarterRecord)> {
        Quarter::ALL.iter().map(|q| (*q, &self.0[q.index()]))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Remediation {
    pub owner_id: Option<UserId>,
    pub action_plan: String,
    pub due_date: String,
}

/// Full audit record attached to one scoped item within one Assessment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Observation {
    pub auditor_id: Option<UserId>,
    pub test_procedures: String,
    pub linked_artifacts: Vec<String>,
    pub quarters: Quarters,
    pub remediation: Remediation,
}

/// Scoping plus observation container. `scope_ids` reference Controls or
/// Requirements depending on `scope_type`; dangling ids are tolerated and
/// filtered at read time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assessment {
    pub id: String,
    pub name: String,
    pub description: String,
    pub scope_type: ScopeType,
    pub scope_ids: Vec<String>,
    pub observations: BTreeMap<String, Observation>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Evidence record supporting a Control's implementation claim.
/// `artifact_id` is the external key and may be a Jira issue key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Artifact {
    pub id: String,
    pub artifact_id: String,
    pub name: String,
    pub description: String,
    pub link: String,
    pub artifact_type: String,
    pub control_id: Option<String>,
    pub linked_evaluation_ids: Vec<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Recorded compliance gap. `compliance_requirement` is retained for the
/// Jira-compatible export column; the snapshot migrator folds it into
/// `control_id` when the canonical field is empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Finding {
    pub id: String,
    pub summary: String,
    pub control_id: Option<String>,
    pub compliance_requirement: Option<String>,
    pub root_cause: String,
    pub remediation_action_plan: String,
    pub remediation_owner: Option<UserId>,
    pub due_date: String,
    pub status: String,
    pub priority: String,
    pub linked_artifacts: Vec<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Clamp a score to the 0..=10 range and snap it to 0.5 steps.
pub fn clamp_score(value: f64) -> f64 {
    let clamped = value.clamp(0.0, 10.0);
    (clamped * 2.0).round() / 2.0
}

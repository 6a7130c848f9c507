#![forbid(unsafe_code)]

use super::support::{join_list, next_id, now_ms, split_list};
use super::{CsvImportReport, FindingCreateRequest, FindingPatch, StoreError, Tracker};
use ct_core::Finding;
use ct_tabular::Schema;

const JIRA_ISSUE_TYPE: &str = "Finding";
const JIRA_PROJECT_KEY: &str = "FND";

const DEFAULT_STATUS: &str = "Open";
const DEFAULT_PRIORITY: &str = "Medium";

impl Tracker {
    pub fn finding_create(&mut self, request: FindingCreateRequest) -> Result<Finding, StoreError> {
        let summary = request.summary.trim().to_string();
        if summary.is_empty() {
            return Err(StoreError::InvalidInput("finding summary must not be empty"));
        }

        let remediation_owner = match request.remediation_owner.as_deref() {
            Some(raw) => self.resolve_identity(raw)?,
            None => None,
        };

        let now = now_ms();
        let finding = Finding {
            id: next_id(&mut self.seqs.findings, "fnd"),
            summary,
            control_id: request.control_id.filter(|v| !v.trim().is_empty()),
            compliance_requirement: request
                .compliance_requirement
                .filter(|v| !v.trim().is_empty()),
            root_cause: request.root_cause,
            remediation_action_plan: request.remediation_action_plan,
            remediation_owner,
            due_date: request.due_date,
            status: non_blank_or(request.status, DEFAULT_STATUS),
            priority: non_blank_or(request.priority, DEFAULT_PRIORITY),
            linked_artifacts: request.linked_artifacts,
            created_at_ms: now,
            updated_at_ms: now,
        };
        self.findings.push(finding.clone());
        self.persist_findings()?;
        Ok(finding)
    }

    pub fn finding_update(
        &mut self,
        id: &str,
        patch: FindingPatch,
    ) -> Result<Option<Finding>, StoreError> {
        let remediation_owner = match patch.remediation_owner.as_deref() {
            Some(raw) => Some(self.resolve_identity(raw)?),
            None => None,
        };

        let Some(finding) = self.findings.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };
        if let Some(summary) = patch.summary {
            finding.summary = summary;
        }
        if let Some(control_id) = patch.control_id {
            finding.control_id = control_id;
        }
        if let Some(root_cause) = patch.root_cause {
            finding.root_cause = root_cause;
        }
        if let Some(plan) = patch.remediation_action_plan {
            finding.remediation_action_plan = plan;
        }
        if let Some(owner) = remediation_owner {
            finding.remediation_owner = owner;
        }
        if let Some(due_date) = patch.due_date {
            finding.due_date = due_date;
        }
        if let Some(status) = patch.status {
            finding.status = status;
        }
        if let Some(priority) = patch.priority {
            finding.priority = priority;
        }
        if let Some(artifacts) = patch.linked_artifacts {
            finding.linked_artifacts = artifacts;
        }
        finding.updated_at_ms = now_ms();
        let updated = finding.clone();
        self.persist_findings()?;
        Ok(Some(updated))
    }

    pub fn finding_delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.findings.len();
        self.findings.retain(|f| f.id != id);
        if self.findings.len() == before {
            return Ok(false);
        }
        self.persist_findings()?;
        Ok(true)
    }

    /// Jira-compatible import: rows append; the Assignee cell goes through
    /// identity resolution so repeated imports reuse the same user record.
    pub fn findings_import_csv(&mut self, text: &str) -> Result<CsvImportReport, StoreError> {
        let imported = finding_schema().read_csv(text)?;
        let mut report = CsvImportReport {
            inserted: 0,
            skipped: imported.skipped,
        };

        for row in imported.rows {
            let remediation_owner = self.resolve_identity(&row.assignee)?;
            let now = now_ms();
            self.findings.push(Finding {
                id: next_id(&mut self.seqs.findings, "fnd"),
                summary: row.summary,
                control_id: if row.control_id.is_empty() {
                    None
                } else {
                    Some(row.control_id)
                },
                compliance_requirement: if row.compliance_requirement.is_empty() {
                    None
                } else {
                    Some(row.compliance_requirement)
                },
                root_cause: row.root_cause,
                remediation_action_plan: row.remediation_action_plan,
                remediation_owner,
                due_date: row.due_date,
                status: non_blank_or(row.status, DEFAULT_STATUS),
                priority: non_blank_or(row.priority, DEFAULT_PRIORITY),
                linked_artifacts: split_list(&row.linked_artifacts),
                created_at_ms: now,
                updated_at_ms: now,
            });
            report.inserted += 1;
        }

        if report.inserted > 0 {
            self.persist_findings()?;
        }
        Ok(report)
    }

    pub fn findings_export_csv(&self) -> Result<String, StoreError> {
        let rows: Vec<FindingRow> = self
            .findings
            .iter()
            .map(|finding| FindingRow {
                summary: finding.summary.clone(),
                priority: finding.priority.clone(),
                assignee: self.user_email_or_name(finding.remediation_owner.as_ref()),
                due_date: finding.due_date.clone(),
                compliance_requirement: finding.compliance_requirement.clone().unwrap_or_default(),
                control_id: finding.control_id.clone().unwrap_or_default(),
                root_cause: finding.root_cause.clone(),
                remediation_action_plan: finding.remediation_action_plan.clone(),
                status: finding.status.clone(),
                linked_artifacts: join_list(&finding.linked_artifacts),
                description: finding.summary.clone(),
            })
            .collect();
        Ok(finding_schema().write_csv(&rows)?)
    }
}

fn non_blank_or(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

#[derive(Debug, Default)]
struct FindingRow {
    summary: String,
    priority: String,
    assignee: String,
    due_date: String,
    compliance_requirement: String,
    control_id: String,
    root_cause: String,
    remediation_action_plan: String,
    status: String,
    linked_artifacts: String,
    description: String,
}

fn finding_schema() -> Schema<FindingRow> {
    Schema::new("Summary")
        .column(
            "Summary",
            |r: &FindingRow| r.summary.clone(),
            |r, v| r.summary = v.trim().to_string(),
        )
        .column(
            "Issue Type",
            |_r: &FindingRow| JIRA_ISSUE_TYPE.to_string(),
            |_r, _v| {},
        )
        .column(
            "Project key",
            |_r: &FindingRow| JIRA_PROJECT_KEY.to_string(),
            |_r, _v| {},
        )
        .column(
            "Priority",
            |r: &FindingRow| r.priority.clone(),
            |r, v| r.priority = v.trim().to_string(),
        )
        .column(
            "Assignee",
            |r: &FindingRow| r.assignee.clone(),
            |r, v| r.assignee = v.trim().to_string(),
        )
        .column(
            "Due date",
            |r: &FindingRow| r.due_date.clone(),
            |r, v| r.due_date = v.trim().to_string(),
        )
        .column(
            "Custom field (Compliance Requirement)",
            |r: &FindingRow| r.compliance_requirement.clone(),
            |r, v| r.compliance_requirement = v.trim().to_string(),
        )
        .column(
            "Custom field (Control ID)",
            |r: &FindingRow| r.control_id.clone(),
            |r, v| r.control_id = v.trim().to_string(),
        )
        .column(
            "Custom field (Root Cause)",
            |r: &FindingRow| r.root_cause.clone(),
            |r, v| r.root_cause = v.trim().to_string(),
        )
        .column(
            "Custom field (Remediation Action Plan)",
            |r: &FindingRow| r.remediation_action_plan.clone(),
            |r, v| r.remediation_action_plan = v.trim().to_string(),
        )
        .column(
            "Custom field (Status)",
            |r: &FindingRow| r.status.clone(),
            |r, v| r.status = v.trim().to_string(),
        )
        .column(
            "Custom field (Linked Artifacts)",
            |r: &FindingRow| r.linked_artifacts.clone(),
            |r, v| r.linked_artifacts = v.trim().to_string(),
        )
        .column(
            "Description",
            |r: &FindingRow| r.description.clone(),
            |r, v| r.description = v.trim().to_string(),
        )
}

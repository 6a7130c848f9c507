#![forbid(unsafe_code)]

use super::support::{join_list, next_id, now_ms, split_list};
use super::{ArtifactCreateRequest, ArtifactPatch, CsvImportReport, StoreError, Tracker};
use ct_core::Artifact;
use ct_tabular::Schema;

const JIRA_ISSUE_TYPE: &str = "Artifact";
const JIRA_PROJECT_KEY: &str = "AR";

impl Tracker {
    pub fn artifact_create(
        &mut self,
        request: ArtifactCreateRequest,
    ) -> Result<Artifact, StoreError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("artifact name must not be empty"));
        }

        let id = next_id(&mut self.seqs.artifacts, "art");
        let artifact_id = request
            .artifact_id
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| id.clone());

        let now = now_ms();
        let artifact = Artifact {
            id,
            artifact_id,
            name,
            description: request.description,
            link: request.link,
            artifact_type: request.artifact_type,
            control_id: request.control_id.filter(|v| !v.trim().is_empty()),
            linked_evaluation_ids: request.linked_evaluation_ids,
            created_at_ms: now,
            updated_at_ms: now,
        };
        self.artifacts.push(artifact.clone());
        self.persist_artifacts()?;
        Ok(artifact)
    }

    pub fn artifact_update(
        &mut self,
        id: &str,
        patch: ArtifactPatch,
    ) -> Result<Option<Artifact>, StoreError> {
        let Some(artifact) = self.artifacts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(artifact_id) = patch.artifact_id {
            artifact.artifact_id = artifact_id;
        }
        if let Some(name) = patch.name {
            artifact.name = name;
        }
        if let Some(description) = patch.description {
            artifact.description = description;
        }
        if let Some(link) = patch.link {
            artifact.link = link;
        }
        if let Some(artifact_type) = patch.artifact_type {
            artifact.artifact_type = artifact_type;
        }
        if let Some(control_id) = patch.control_id {
            artifact.control_id = control_id;
        }
        if let Some(linked) = patch.linked_evaluation_ids {
            artifact.linked_evaluation_ids = linked;
        }
        artifact.updated_at_ms = now_ms();
        let updated = artifact.clone();
        self.persist_artifacts()?;
        Ok(Some(updated))
    }

    pub fn artifact_delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.artifacts.len();
        self.artifacts.retain(|a| a.id != id);
        if self.artifacts.len() == before {
            return Ok(false);
        }
        self.persist_artifacts()?;
        Ok(true)
    }

    /// Jira-compatible import: every row appends a new artifact; ids are
    /// generated locally, the external `artifact_id` comes back later from
    /// the issue tracker.
    pub fn artifacts_import_csv(&mut self, text: &str) -> Result<CsvImportReport, StoreError> {
        let imported = artifact_schema().read_csv(text)?;
        let mut report = CsvImportReport {
            inserted: 0,
            skipped: imported.skipped,
        };

        for row in imported.rows {
            let id = next_id(&mut self.seqs.artifacts, "art");
            let now = now_ms();
            self.artifacts.push(Artifact {
                artifact_id: id.clone(),
                id,
                name: row.summary,
                description: row.description,
                link: row.link,
                artifact_type: row.artifact_type,
                control_id: if row.control_id.is_empty() {
                    None
                } else {
                    Some(row.control_id)
                },
                linked_evaluation_ids: split_list(&row.linked_evaluation_ids),
                created_at_ms: now,
                updated_at_ms: now,
            });
            report.inserted += 1;
        }

        if report.inserted > 0 {
            self.persist_artifacts()?;
        }
        Ok(report)
    }

    pub fn artifacts_export_csv(&self) -> Result<String, StoreError> {
        let rows: Vec<ArtifactRow> = self
            .artifacts
            .iter()
            .map(|artifact| ArtifactRow {
                summary: artifact.name.clone(),
                link: artifact.link.clone(),
                control_id: artifact.control_id.clone().unwrap_or_default(),
                linked_evaluation_ids: join_list(&artifact.linked_evaluation_ids),
                artifact_type: artifact.artifact_type.clone(),
                description: artifact.description.clone(),
            })
            .collect();
        Ok(artifact_schema().write_csv(&rows)?)
    }
}

#[derive(Debug, Default)]
struct ArtifactRow {
    summary: String,
    link: String,
    control_id: String,
    linked_evaluation_ids: String,
    artifact_type: String,
    description: String,
}

fn artifact_schema() -> Schema<ArtifactRow> {
    Schema::new("Summary")
        .column(
            "Summary",
            |r: &ArtifactRow| r.summary.clone(),
            |r, v| r.summary = v.trim().to_string(),
        )
        .column(
            "Issue Type",
            |_r: &ArtifactRow| JIRA_ISSUE_TYPE.to_string(),
            |_r, _v| {},
        )
        .column(
            "Project key",
            |_r: &ArtifactRow| JIRA_PROJECT_KEY.to_string(),
            |_r, _v| {},
        )
        .column(
            "Custom field (Link)",
            |r: &ArtifactRow| r.link.clone(),
            |r, v| r.link = v.trim().to_string(),
        )
        .column(
            "Custom field (Control ID)",
            |r: &ArtifactRow| r.control_id.clone(),
            |r, v| r.control_id = v.trim().to_string(),
        )
        .column(
            "Custom field (Linked Evaluation IDs)",
            |r: &ArtifactRow| r.linked_evaluation_ids.clone(),
            |r, v| r.linked_evaluation_ids = v.trim().to_string(),
        )
        .column(
            "Custom field (Artifact Type)",
            |r: &ArtifactRow| r.artifact_type.clone(),
            |r, v| r.artifact_type = v.trim().to_string(),
        )
        .column(
            "Description",
            |r: &ArtifactRow| r.description.clone(),
            |r, v| r.description = v.trim().to_string(),
        )
}

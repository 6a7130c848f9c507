#![forbid(unsafe_code)]

use super::support::{current_quarter, join_list, next_id, now_ms, split_list};
use super::{
    AssessmentCreateRequest, AssessmentPatch, CsvImportReport, ObservationPatch, Progress,
    QuarterPatch, StoreError, Tracker,
};
use ct_core::{
    Assessment, Observation, Quarter, Quarters, ScopeType, TestingStatus, clamp_score,
};
use ct_tabular::{Schema, quarter_block};

impl Tracker {
    pub fn assessment_create(
        &mut self,
        request: AssessmentCreateRequest,
    ) -> Result<Assessment, StoreError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("assessment name must not be empty"));
        }

        let now = now_ms();
        let assessment = Assessment {
            id: next_id(&mut self.seqs.assessments, "asm"),
            name,
            description: request.description,
            scope_type: request.scope_type,
            scope_ids: Vec::new(),
            observations: Default::default(),
            created_at_ms: now,
            updated_at_ms: now,
        };
        self.assessments.push(assessment.clone());
        self.persist_assessments()?;
        Ok(assessment)
    }

    pub fn assessment_update(
        &mut self,
        id: &str,
        patch: AssessmentPatch,
    ) -> Result<Option<Assessment>, StoreError> {
        let Some(assessment) = self.assessments.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(StoreError::InvalidInput("assessment name must not be empty"));
            }
            assessment.name = name;
        }
        if let Some(description) = patch.description {
            assessment.description = description;
        }
        assessment.updated_at_ms = now_ms();
        let updated = assessment.clone();
        self.persist_assessments()?;
        Ok(Some(updated))
    }

    pub fn assessment_delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.assessments.len();
        self.assessments.retain(|a| a.id != id);
        if self.assessments.len() == before {
            return Ok(false);
        }
        self.persist_assessments()?;
        Ok(true)
    }

    /// Append an item to the assessment's scope and seed its empty
    /// Observation: four quarter slots, all NotStarted. Re-adding a scoped
    /// item is a no-op.
    pub fn assessment_add_to_scope(
        &mut self,
        assessment_id: &str,
        item_id: &str,
    ) -> Result<bool, StoreError> {
        let Some(assessment) = self.assessments.iter_mut().find(|a| a.id == assessment_id) else {
            return Ok(false);
        };
        if assessment.scope_ids.iter().any(|id| id == item_id) {
            return Ok(false);
        }
        assessment.scope_ids.push(item_id.to_string());
        assessment
            .observations
            .insert(item_id.to_string(), Observation::default());
        assessment.updated_at_ms = now_ms();
        self.persist_assessments()?;
        Ok(true)
    }

    pub fn assessment_add_many_to_scope(
        &mut self,
        assessment_id: &str,
        item_ids: &[String],
    ) -> Result<usize, StoreError> {
        let mut added = 0;
        for item_id in item_ids {
            if self.assessment_add_to_scope(assessment_id, item_id)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Remove an item from scope and discard its Observation.
    pub fn assessment_remove_from_scope(
        &mut self,
        assessment_id: &str,
        item_id: &str,
    ) -> Result<bool, StoreError> {
        let Some(assessment) = self.assessments.iter_mut().find(|a| a.id == assessment_id) else {
            return Ok(false);
        };
        let before = assessment.scope_ids.len();
        assessment.scope_ids.retain(|id| id != item_id);
        if assessment.scope_ids.len() == before {
            return Ok(false);
        }
        assessment.observations.remove(item_id);
        assessment.updated_at_ms = now_ms();
        self.persist_assessments()?;
        Ok(true)
    }

    /// Scope ids filtered to items that still exist in the collection the
    /// scope type references; dangling ids are tolerated in storage but
    /// never surfaced.
    pub fn assessment_scope(&self, assessment_id: &str) -> Vec<String> {
        let Some(assessment) = self.assessment(assessment_id) else {
            return Vec::new();
        };
        assessment
            .scope_ids
            .iter()
            .filter(|id| match assessment.scope_type {
                ScopeType::Controls => self.control(id).is_some(),
                ScopeType::Requirements => self.requirement(id).is_some(),
            })
            .cloned()
            .collect()
    }

    pub fn observation(&self, assessment_id: &str, item_id: &str) -> Option<&Observation> {
        self.assessment(assessment_id)?.observations.get(item_id)
    }

    /// Merge observation-level fields for one scoped item. Items outside the
    /// scope are a no-op.
    pub fn assessment_update_observation(
        &mut self,
        assessment_id: &str,
        item_id: &str,
        patch: ObservationPatch,
    ) -> Result<Option<Observation>, StoreError> {
        let auditor_id = match patch.auditor.as_deref() {
            Some(raw) => Some(self.resolve_identity(raw)?),
            None => None,
        };
        let remediation_owner_id = match patch.remediation_owner.as_deref() {
            Some(raw) => Some(self.resolve_identity(raw)?),
            None => None,
        };

        let Some(assessment) = self.assessments.iter_mut().find(|a| a.id == assessment_id) else {
            return Ok(None);
        };
        let Some(observation) = assessment.observations.get_mut(item_id) else {
            return Ok(None);
        };

        if let Some(auditor_id) = auditor_id {
            observation.auditor_id = auditor_id;
        }
        if let Some(procedures) = patch.test_procedures {
            observation.test_procedures = procedures;
        }
        if let Some(artifacts) = patch.linked_artifacts {
            observation.linked_artifacts = artifacts;
        }
        if let Some(owner_id) = remediation_owner_id {
            observation.remediation.owner_id = owner_id;
        }
        if let Some(action_plan) = patch.action_plan {
            observation.remediation.action_plan = action_plan;
        }
        if let Some(due_date) = patch.due_date {
            observation.remediation.due_date = due_date;
        }
        assessment.updated_at_ms = now_ms();

        let updated = observation.clone();
        self.persist_assessments()?;
        Ok(Some(updated))
    }

    /// Merge fields into one quarter record of one scoped item's
    /// Observation. Scores are clamped to the 0..=10 half-step grid.
    pub fn assessment_update_quarter(
        &mut self,
        assessment_id: &str,
        item_id: &str,
        quarter: Quarter,
        patch: QuarterPatch,
    ) -> Result<Option<ct_core::QuarterRecord>, StoreError> {
        let Some(assessment) = self.assessments.iter_mut().find(|a| a.id == assessment_id) else {
            return Ok(None);
        };
        let Some(observation) = assessment.observations.get_mut(item_id) else {
            return Ok(None);
        };

        let record = observation.quarters.get_mut(quarter);
        if let Some(score) = patch.actual_score {
            record.actual_score = clamp_score(score);
        }
        if let Some(score) = patch.target_score {
            record.target_score = clamp_score(score);
        }
        if let Some(text) = patch.observations {
            record.observations = text;
        }
        if let Some(date) = patch.observation_date {
            record.observation_date = date;
        }
        if let Some(status) = patch.testing_status {
            record.testing_status = status;
        }
        if let Some(examine) = patch.examine {
            record.examine = examine;
        }
        if let Some(interview) = patch.interview {
            record.interview = interview;
        }
        if let Some(test) = patch.test {
            record.test = test;
        }
        assessment.updated_at_ms = now_ms();

        let updated = record.clone();
        self.persist_assessments()?;
        Ok(Some(updated))
    }

    /// Progress is always reported against a single quarter: only one
    /// quarter is "live" at a time in the audit cadence.
    pub fn assessment_progress(&self, assessment_id: &str, quarter: Quarter) -> Option<Progress> {
        let assessment = self.assessment(assessment_id)?;
        let total = assessment.scope_ids.len();
        let mut completed = 0;
        let mut in_progress = 0;
        for item_id in &assessment.scope_ids {
            let status = assessment
                .observations
                .get(item_id)
                .map(|observation| observation.quarters.get(quarter).testing_status)
                .unwrap_or(TestingStatus::NotStarted);
            match status {
                TestingStatus::Complete => completed += 1,
                TestingStatus::InProgress | TestingStatus::Submitted => in_progress += 1,
                TestingStatus::NotStarted => {}
            }
        }
        let percentage = if total == 0 {
            0
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        };
        Some(Progress {
            total,
            completed,
            in_progress,
            percentage,
        })
    }

    pub fn assessment_progress_current(&self, assessment_id: &str) -> Option<Progress> {
        self.assessment_progress(assessment_id, current_quarter())
    }

    /// Template clone: scope and observations are deep-copied, then every
    /// quarter is reset to NotStarted with its observation text, date, and
    /// actual score cleared. Targets, procedures, auditors, and remediation
    /// plans carry over.
    pub fn assessment_clone(
        &mut self,
        assessment_id: &str,
        new_name: &str,
    ) -> Result<Option<Assessment>, StoreError> {
        let new_name = new_name.trim().to_string();
        if new_name.is_empty() {
            return Err(StoreError::InvalidInput("assessment name must not be empty"));
        }
        let Some(source) = self.assessment(assessment_id) else {
            return Ok(None);
        };

        let now = now_ms();
        let mut clone = source.clone();
        clone.id = next_id(&mut self.seqs.assessments, "asm");
        clone.name = new_name;
        clone.created_at_ms = now;
        clone.updated_at_ms = now;
        for observation in clone.observations.values_mut() {
            for quarter in Quarter::ALL {
                let record = observation.quarters.get_mut(quarter);
                record.testing_status = TestingStatus::NotStarted;
                record.observations.clear();
                record.observation_date.clear();
                record.actual_score = 0.0;
            }
        }

        self.assessments.push(clone.clone());
        self.persist_assessments()?;
        Ok(Some(clone))
    }

    /// Export one row per (assessment, scoped item), in stored scope order.
    pub fn assessments_export_csv(&self) -> Result<String, StoreError> {
        let mut rows = Vec::new();
        for assessment in &self.assessments {
            for item_id in &assessment.scope_ids {
                let observation = assessment
                    .observations
                    .get(item_id)
                    .cloned()
                    .unwrap_or_default();
                rows.push(ObservationRow {
                    id: item_id.clone(),
                    assessment: assessment.name.clone(),
                    scope_type: assessment.scope_type.as_str().to_string(),
                    auditor: self.user_export_string(observation.auditor_id.as_ref()),
                    test_procedures: observation.test_procedures.clone(),
                    quarters: observation.quarters.clone(),
                    linked_artifacts: join_list(&observation.linked_artifacts),
                    remediation_owner: self
                        .user_export_string(observation.remediation.owner_id.as_ref()),
                    action_plan: observation.remediation.action_plan.clone(),
                    due_date: observation.remediation.due_date.clone(),
                });
            }
        }
        Ok(observation_schema().write_csv(&rows)?)
    }

    /// Import rows into assessments matched by name, creating an assessment
    /// when the name is unknown. Each row adds its item to scope (if absent)
    /// and replaces that item's Observation. Rows are fully parsed before
    /// any mutation.
    pub fn assessments_import_csv(&mut self, text: &str) -> Result<CsvImportReport, StoreError> {
        let imported = observation_schema().read_csv(text)?;
        let mut report = CsvImportReport {
            inserted: 0,
            skipped: imported.skipped,
        };

        let mut changed = false;
        for row in imported.rows {
            if row.assessment.trim().is_empty() {
                report.skipped += 1;
                continue;
            }

            let auditor_id = self.resolve_identity(&row.auditor)?;
            let remediation_owner_id = self.resolve_identity(&row.remediation_owner)?;

            let assessment_index = match self
                .assessments
                .iter()
                .position(|a| a.name == row.assessment)
            {
                Some(index) => index,
                None => {
                    let now = now_ms();
                    self.assessments.push(Assessment {
                        id: next_id(&mut self.seqs.assessments, "asm"),
                        name: row.assessment.clone(),
                        description: String::new(),
                        scope_type: ScopeType::parse(&row.scope_type)
                            .unwrap_or(ScopeType::Controls),
                        scope_ids: Vec::new(),
                        observations: Default::default(),
                        created_at_ms: now,
                        updated_at_ms: now,
                    });
                    self.assessments.len() - 1
                }
            };

            let assessment = &mut self.assessments[assessment_index];
            if !assessment.scope_ids.iter().any(|id| id == &row.id) {
                assessment.scope_ids.push(row.id.clone());
            }
            assessment.observations.insert(
                row.id.clone(),
                Observation {
                    auditor_id,
                    test_procedures: row.test_procedures,
                    linked_artifacts: split_list(&row.linked_artifacts),
                    quarters: row.quarters,
                    remediation: ct_core::Remediation {
                        owner_id: remediation_owner_id,
                        action_plan: row.action_plan,
                        due_date: row.due_date,
                    },
                },
            );
            assessment.updated_at_ms = now_ms();
            report.inserted += 1;
            changed = true;
        }

        if changed {
            self.persist_assessments()?;
        }
        Ok(report)
    }
}

#[derive(Debug, Default)]
struct ObservationRow {
    id: String,
    assessment: String,
    scope_type: String,
    auditor: String,
    test_procedures: String,
    quarters: Quarters,
    linked_artifacts: String,
    remediation_owner: String,
    action_plan: String,
    due_date: String,
}

fn observation_schema() -> Schema<ObservationRow> {
    let mut schema = Schema::new("ID")
        .column(
            "ID",
            |r: &ObservationRow| r.id.clone(),
            |r, v| r.id = v.trim().to_string(),
        )
        .column(
            "Assessment",
            |r: &ObservationRow| r.assessment.clone(),
            |r, v| r.assessment = v.trim().to_string(),
        )
        .column(
            "Scope Type",
            |r: &ObservationRow| r.scope_type.clone(),
            |r, v| r.scope_type = v.trim().to_string(),
        )
        .column(
            "Auditor",
            |r: &ObservationRow| r.auditor.clone(),
            |r, v| r.auditor = v.trim().to_string(),
        )
        .column(
            "Test Procedure(s)",
            |r: &ObservationRow| r.test_procedures.clone(),
            |r, v| r.test_procedures = v.trim().to_string(),
        );

    quarter_block(
        &mut schema,
        |row: &ObservationRow, quarter| row.quarters.get(quarter),
        |row: &mut ObservationRow, quarter| row.quarters.get_mut(quarter),
    );

    schema
        .column(
            "Linked Artifacts",
            |r: &ObservationRow| r.linked_artifacts.clone(),
            |r, v| r.linked_artifacts = v.trim().to_string(),
        )
        .column(
            "Remediation Owner",
            |r: &ObservationRow| r.remediation_owner.clone(),
            |r, v| r.remediation_owner = v.trim().to_string(),
        )
        .column(
            "Action Plan",
            |r: &ObservationRow| r.action_plan.clone(),
            |r, v| r.action_plan = v.trim().to_string(),
        )
        .column(
            "Remediation Due Date",
            |r: &ObservationRow| r.due_date.clone(),
            |r, v| r.due_date = v.trim().to_string(),
        )
}

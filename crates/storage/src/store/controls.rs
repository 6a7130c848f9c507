#![forbid(unsafe_code)]

use super::support::{dedupe_preserving_order, join_list, now_ms, split_list};
use super::{ControlCreateRequest, ControlPatch, CsvImportReport, StoreError, Tracker};
use ct_core::Control;
use ct_tabular::Schema;

impl Tracker {
    pub fn control_create(&mut self, request: ControlCreateRequest) -> Result<Control, StoreError> {
        let control_id = request.control_id.trim().to_string();
        if control_id.is_empty() {
            return Err(StoreError::InvalidInput("control id must not be empty"));
        }
        if self.control(&control_id).is_some() {
            return Err(StoreError::DuplicateKey {
                field: "control_id",
                value: control_id,
            });
        }

        let owner_id = match request.owner.as_deref() {
            Some(raw) => self.resolve_identity(raw)?,
            None => None,
        };
        let mut stakeholder_ids = Vec::new();
        for raw in &request.stakeholders {
            if let Some(id) = self.resolve_identity(raw)? {
                stakeholder_ids.push(id);
            }
        }
        dedupe_preserving_order(&mut stakeholder_ids);

        let mut linked_requirement_ids = request.linked_requirement_ids;
        dedupe_preserving_order(&mut linked_requirement_ids);

        let now = now_ms();
        let control = Control {
            control_id,
            implementation_description: request.implementation_description,
            owner_id,
            stakeholder_ids,
            linked_requirement_ids,
            created_at_ms: now,
            updated_at_ms: now,
        };
        self.controls.push(control.clone());
        self.persist_controls()?;
        Ok(control)
    }

    /// Merge a patch into one control. Unknown ids are a no-op returning
    /// `None` so stale UI references never error.
    pub fn control_update(
        &mut self,
        control_id: &str,
        patch: ControlPatch,
    ) -> Result<Option<Control>, StoreError> {
        let Some(index) = self
            .controls
            .iter()
            .position(|c| c.control_id == control_id)
        else {
            return Ok(None);
        };

        let owner_id = match patch.owner.as_deref() {
            Some(raw) => Some(self.resolve_identity(raw)?),
            None => None,
        };
        let stakeholder_ids = match &patch.stakeholders {
            Some(raws) => {
                let mut ids = Vec::new();
                for raw in raws {
                    if let Some(id) = self.resolve_identity(raw)? {
                        ids.push(id);
                    }
                }
                dedupe_preserving_order(&mut ids);
                Some(ids)
            }
            None => None,
        };

        let control = &mut self.controls[index];
        if let Some(description) = patch.implementation_description {
            control.implementation_description = description;
        }
        if let Some(owner_id) = owner_id {
            control.owner_id = owner_id;
        }
        if let Some(ids) = stakeholder_ids {
            control.stakeholder_ids = ids;
        }
        if let Some(mut linked) = patch.linked_requirement_ids {
            dedupe_preserving_order(&mut linked);
            control.linked_requirement_ids = linked;
        }
        control.updated_at_ms = now_ms();

        let updated = control.clone();
        self.persist_controls()?;
        Ok(Some(updated))
    }

    /// Remove a control. References held by assessments, artifacts, and
    /// findings are left dangling; read paths filter them.
    pub fn control_delete(&mut self, control_id: &str) -> Result<bool, StoreError> {
        let before = self.controls.len();
        self.controls.retain(|c| c.control_id != control_id);
        if self.controls.len() == before {
            return Ok(false);
        }
        self.persist_controls()?;
        Ok(true)
    }

    /// Apply one patch across many controls; unknown ids are skipped.
    pub fn controls_update_many(
        &mut self,
        control_ids: &[String],
        patch: ControlPatch,
    ) -> Result<usize, StoreError> {
        let mut updated = 0;
        for control_id in control_ids {
            if self.control_update(control_id, patch.clone())?.is_some() {
                updated += 1;
            }
        }
        Ok(updated)
    }

    /// Import appends: rows whose `Control ID` already exists are skipped,
    /// never merged. The file is fully parsed before the collection is
    /// touched, so a malformed file leaves the store unchanged.
    pub fn controls_import_csv(&mut self, text: &str) -> Result<CsvImportReport, StoreError> {
        let imported = control_schema().read_csv(text)?;
        let mut report = CsvImportReport {
            inserted: 0,
            skipped: imported.skipped,
        };

        let mut inserted = false;
        for row in imported.rows {
            if self.control(&row.control_id).is_some() {
                report.skipped += 1;
                continue;
            }

            let owner_id = self.resolve_identity(&row.owner)?;
            let mut stakeholder_ids = Vec::new();
            for entry in split_list(&row.stakeholders) {
                if let Some(id) = self.resolve_identity(&entry)? {
                    stakeholder_ids.push(id);
                }
            }
            dedupe_preserving_order(&mut stakeholder_ids);

            let now = now_ms();
            self.controls.push(Control {
                control_id: row.control_id,
                implementation_description: row.implementation_description,
                owner_id,
                stakeholder_ids,
                linked_requirement_ids: split_list(&row.linked_requirements),
                created_at_ms: now,
                updated_at_ms: now,
            });
            report.inserted += 1;
            inserted = true;
        }

        if inserted {
            self.persist_controls()?;
        }
        Ok(report)
    }

    pub fn controls_export_csv(&self) -> Result<String, StoreError> {
        let rows: Vec<ControlRow> = self
            .controls
            .iter()
            .map(|control| ControlRow {
                control_id: control.control_id.clone(),
                implementation_description: control.implementation_description.clone(),
                owner: self.user_export_string(control.owner_id.as_ref()),
                stakeholders: join_list(
                    &control
                        .stakeholder_ids
                        .iter()
                        .map(|id| self.user_export_string(Some(id)))
                        .collect::<Vec<_>>(),
                ),
                linked_requirements: join_list(&control.linked_requirement_ids),
            })
            .collect();
        Ok(control_schema().write_csv(&rows)?)
    }
}

#[derive(Debug, Default)]
struct ControlRow {
    control_id: String,
    implementation_description: String,
    owner: String,
    stakeholders: String,
    linked_requirements: String,
}

fn control_schema() -> Schema<ControlRow> {
    Schema::new("Control ID")
        .column(
            "Control ID",
            |r: &ControlRow| r.control_id.clone(),
            |r, v| r.control_id = v.trim().to_string(),
        )
        .column(
            "Control Implementation Description",
            |r: &ControlRow| r.implementation_description.clone(),
            |r, v| r.implementation_description = v.trim().to_string(),
        )
        .column(
            "Control Owner ID",
            |r: &ControlRow| r.owner.clone(),
            |r, v| r.owner = v.trim().to_string(),
        )
        .column(
            "Stakeholder IDs",
            |r: &ControlRow| r.stakeholders.clone(),
            |r, v| r.stakeholders = v.trim().to_string(),
        )
        .column(
            "Linked Requirements",
            |r: &ControlRow| r.linked_requirements.clone(),
            |r, v| r.linked_requirements = v.trim().to_string(),
        )
}

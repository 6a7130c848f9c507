#![forbid(unsafe_code)]

use super::{CsvImportReport, StoreError, Tracker};
use ct_core::Requirement;
use ct_tabular::{Schema, parse_yes_no, yes_no};
use std::collections::BTreeSet;

impl Tracker {
    /// Toggle the one user-editable field of a framework requirement.
    /// Unknown ids are a no-op.
    pub fn requirement_set_in_scope(
        &mut self,
        id: &str,
        in_scope: bool,
    ) -> Result<Option<Requirement>, StoreError> {
        let Some(requirement) = self.requirements.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        requirement.in_scope = in_scope;
        let updated = requirement.clone();
        self.persist_requirements()?;
        Ok(Some(updated))
    }

    /// Apply one scope transition across many requirements in one persisted
    /// write.
    pub fn requirements_set_in_scope(
        &mut self,
        ids: &[String],
        in_scope: bool,
    ) -> Result<usize, StoreError> {
        let wanted: BTreeSet<&str> = ids.iter().map(String::as_str).collect();
        let mut changed = 0;
        for requirement in &mut self.requirements {
            if wanted.contains(requirement.id.as_str()) {
                requirement.in_scope = in_scope;
                changed += 1;
            }
        }
        if changed > 0 {
            self.persist_requirements()?;
        }
        Ok(changed)
    }

    /// Framework import is wholesale per framework: every framework present
    /// in the file has its existing rows replaced by the file's rows; other
    /// frameworks are untouched. Requirements are never deleted one at a
    /// time.
    pub fn requirements_import_csv(&mut self, text: &str) -> Result<CsvImportReport, StoreError> {
        let imported = requirement_schema().read_csv(text)?;
        let report = CsvImportReport {
            inserted: imported.rows.len(),
            skipped: imported.skipped,
        };
        if imported.rows.is_empty() {
            return Ok(report);
        }

        let frameworks: BTreeSet<String> = imported
            .rows
            .iter()
            .map(|r| r.framework_id.clone())
            .collect();
        self.requirements
            .retain(|r| !frameworks.contains(&r.framework_id));
        self.requirements.extend(imported.rows);
        self.persist_requirements()?;
        Ok(report)
    }

    pub fn requirements_export_csv(&self) -> Result<String, StoreError> {
        Ok(requirement_schema().write_csv(&self.requirements)?)
    }
}

fn requirement_schema() -> Schema<Requirement> {
    Schema::new("Requirement ID")
        .column(
            "Requirement ID",
            |r: &Requirement| r.id.clone(),
            |r, v| {
                r.id = v.trim().to_string();
                if r.subcategory_id.is_empty() {
                    r.subcategory_id = r.id.clone();
                }
            },
        )
        .column(
            "Framework",
            |r: &Requirement| r.framework_id.clone(),
            |r, v| r.framework_id = v.trim().to_string(),
        )
        .column(
            "Function",
            |r: &Requirement| r.function.clone(),
            |r, v| r.function = v.trim().to_string(),
        )
        .column(
            "Category",
            |r: &Requirement| r.category.clone(),
            |r, v| r.category = v.trim().to_string(),
        )
        .column(
            "Category ID",
            |r: &Requirement| r.category_id.clone(),
            |r, v| r.category_id = v.trim().to_string(),
        )
        .column(
            "Subcategory ID",
            |r: &Requirement| r.subcategory_id.clone(),
            |r, v| {
                if !v.trim().is_empty() {
                    r.subcategory_id = v.trim().to_string();
                }
            },
        )
        .column(
            "Subcategory Description",
            |r: &Requirement| r.subcategory_description.clone(),
            |r, v| r.subcategory_description = v.trim().to_string(),
        )
        .column(
            "Implementation Example",
            |r: &Requirement| r.implementation_example.clone(),
            |r, v| r.implementation_example = v.trim().to_string(),
        )
        .column(
            "In Scope",
            |r: &Requirement| yes_no(r.in_scope).to_string(),
            |r, v| r.in_scope = parse_yes_no(v),
        )
}

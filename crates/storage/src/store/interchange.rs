#![forbid(unsafe_code)]

use super::support::{next_id, now_ms};
use super::{StoreError, Tracker};
use ct_core::{Assessment, Control, Requirement, User, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cross-tool JSON envelope. The `data` key is required: an envelope
/// without it is a format error, not an empty import.
#[derive(Debug, Serialize, Deserialize)]
struct Bundle {
    data: BundleData,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct BundleData {
    users: Vec<User>,
    requirements: Vec<Requirement>,
    controls: Vec<Control>,
    assessments: Vec<Assessment>,
}

/// Per-section insert counts from a bundle import.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BundleReport {
    pub users: usize,
    pub requirements: usize,
    pub controls: usize,
    pub assessments: usize,
}

impl Tracker {
    pub fn export_bundle(&self) -> Result<String, StoreError> {
        let bundle = Bundle {
            data: BundleData {
                users: self.users().to_vec(),
                requirements: self.requirements().to_vec(),
                controls: self.controls().to_vec(),
                assessments: self.assessments().to_vec(),
            },
        };
        Ok(serde_json::to_string_pretty(&bundle)?)
    }

    /// Import a bundle additively: users merge through identity resolution
    /// (email-keyed, so a round-trip never duplicates people), other
    /// sections append with their user references remapped. Entities whose
    /// key already exists are skipped, not merged.
    pub fn import_bundle(&mut self, text: &str) -> Result<BundleReport, StoreError> {
        let bundle: Bundle = serde_json::from_str(text)?;
        let data = bundle.data;
        let mut report = BundleReport::default();

        // Users first so every remapped reference lands on a local id.
        let mut user_map: HashMap<UserId, UserId> = HashMap::new();
        for user in data.users {
            let before = self.users().len();
            let raw = match &user.email {
                Some(email) => format!("{} <{}>", user.name, email),
                None => user.name.clone(),
            };
            if let Some(local_id) = self.resolve_identity(&raw)? {
                if self.users().len() > before {
                    report.users += 1;
                }
                user_map.insert(user.id, local_id);
            }
        }
        let remap = |id: &Option<UserId>| -> Option<UserId> {
            id.as_ref()
                .map(|id| user_map.get(id).cloned().unwrap_or_else(|| id.clone()))
        };

        let mut requirements_changed = false;
        for requirement in data.requirements {
            if self.requirement(&requirement.id).is_some() {
                continue;
            }
            self.requirements.push(requirement);
            report.requirements += 1;
            requirements_changed = true;
        }

        let mut controls_changed = false;
        for mut control in data.controls {
            if control.control_id.trim().is_empty() || self.control(&control.control_id).is_some()
            {
                continue;
            }
            control.owner_id = remap(&control.owner_id);
            control.stakeholder_ids = control
                .stakeholder_ids
                .iter()
                .map(|id| user_map.get(id).cloned().unwrap_or_else(|| id.clone()))
                .collect();
            self.controls.push(control);
            report.controls += 1;
            controls_changed = true;
        }

        let mut assessments_changed = false;
        for mut assessment in data.assessments {
            if self.assessments.iter().any(|a| a.name == assessment.name) {
                continue;
            }
            assessment.id = next_id(&mut self.seqs.assessments, "asm");
            let now = now_ms();
            assessment.created_at_ms = now;
            assessment.updated_at_ms = now;
            for observation in assessment.observations.values_mut() {
                observation.auditor_id = remap(&observation.auditor_id);
                observation.remediation.owner_id = remap(&observation.remediation.owner_id);
            }
            self.assessments.push(assessment);
            report.assessments += 1;
            assessments_changed = true;
        }

        if requirements_changed {
            self.persist_requirements()?;
        }
        if controls_changed {
            self.persist_controls()?;
        }
        if assessments_changed {
            self.persist_assessments()?;
        }
        Ok(report)
    }
}

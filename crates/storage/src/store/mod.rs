#![forbid(unsafe_code)]

mod aggregate;
mod artifacts;
mod assessments;
mod controls;
mod error;
mod findings;
mod interchange;
mod requests;
mod requirements;
mod support;
mod users;

pub use aggregate::RequirementRollup;
pub use error::StoreError;
pub use interchange::BundleReport;
pub use requests::*;
pub use users::UNASSIGNED;

use crate::snapshot::{SnapshotStore, StoreDef, seed, stores};
use ct_core::{Artifact, Assessment, Control, Finding, Requirement, User};
use serde::Serialize;
use serde_json::{Value, json};
use std::path::Path;
use support::now_ms;

#[derive(Debug, Default)]
struct Seqs {
    users: i64,
    assessments: i64,
    artifacts: i64,
    findings: i64,
}

/// The data engine: owns every entity collection in memory, mutates it
/// synchronously, and persists the mutated store's snapshot before a
/// mutation returns. Change notification is by explicit return value; there
/// is no ambient observer.
#[derive(Debug)]
pub struct Tracker {
    snapshots: SnapshotStore,
    users: Vec<User>,
    requirements: Vec<Requirement>,
    controls: Vec<Control>,
    assessments: Vec<Assessment>,
    artifacts: Vec<Artifact>,
    findings: Vec<Finding>,
    seqs: Seqs,
}

impl Tracker {
    /// Open the engine at a storage directory: every store's snapshot is
    /// loaded through the migration pipeline, and the starter framework is
    /// seeded only into an empty requirements collection.
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut snapshots = SnapshotStore::open(storage_dir)?;

        let (users, users_seq) = load_collection::<User>(&mut snapshots, stores::USERS)?;
        let (requirements, _) =
            load_collection::<Requirement>(&mut snapshots, stores::REQUIREMENTS)?;
        let (controls, _) = load_collection::<Control>(&mut snapshots, stores::CONTROLS)?;
        let (assessments, assessments_seq) =
            load_collection::<Assessment>(&mut snapshots, stores::ASSESSMENTS)?;
        let (artifacts, artifacts_seq) =
            load_collection::<Artifact>(&mut snapshots, stores::ARTIFACTS)?;
        let (findings, findings_seq) =
            load_collection::<Finding>(&mut snapshots, stores::FINDINGS)?;

        let mut tracker = Self {
            snapshots,
            users,
            requirements,
            controls,
            assessments,
            artifacts,
            findings,
            seqs: Seqs {
                users: users_seq,
                assessments: assessments_seq,
                artifacts: artifacts_seq,
                findings: findings_seq,
            },
        };

        if tracker.requirements.is_empty() {
            tracker.requirements = seed::starter_requirements();
            tracker.persist_requirements()?;
        }

        Ok(tracker)
    }

    pub fn storage_dir(&self) -> &Path {
        self.snapshots.storage_dir()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn assessments(&self) -> &[Assessment] {
        &self.assessments
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn control(&self, control_id: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.control_id == control_id)
    }

    pub fn requirement(&self, id: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.id == id)
    }

    pub fn assessment(&self, id: &str) -> Option<&Assessment> {
        self.assessments.iter().find(|a| a.id == id)
    }

    pub fn artifact(&self, id: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.id == id)
    }

    pub fn finding(&self, id: &str) -> Option<&Finding> {
        self.findings.iter().find(|f| f.id == id)
    }

    fn persist_users(&mut self) -> Result<(), StoreError> {
        persist(&mut self.snapshots, stores::USERS, &self.users, self.seqs.users)
    }

    fn persist_requirements(&mut self) -> Result<(), StoreError> {
        persist(&mut self.snapshots, stores::REQUIREMENTS, &self.requirements, 0)
    }

    fn persist_controls(&mut self) -> Result<(), StoreError> {
        persist(&mut self.snapshots, stores::CONTROLS, &self.controls, 0)
    }

    fn persist_assessments(&mut self) -> Result<(), StoreError> {
        persist(
            &mut self.snapshots,
            stores::ASSESSMENTS,
            &self.assessments,
            self.seqs.assessments,
        )
    }

    fn persist_artifacts(&mut self) -> Result<(), StoreError> {
        persist(
            &mut self.snapshots,
            stores::ARTIFACTS,
            &self.artifacts,
            self.seqs.artifacts,
        )
    }

    fn persist_findings(&mut self) -> Result<(), StoreError> {
        persist(
            &mut self.snapshots,
            stores::FINDINGS,
            &self.findings,
            self.seqs.findings,
        )
    }
}

fn load_collection<T: serde::de::DeserializeOwned>(
    snapshots: &mut SnapshotStore,
    def: StoreDef,
) -> Result<(Vec<T>, i64), StoreError> {
    let Some(payload) = snapshots.load_migrated(def, now_ms())? else {
        return Ok((Vec::new(), 0));
    };

    let items = payload.get("items").cloned().unwrap_or(Value::Array(Vec::new()));
    let items: Vec<T> = serde_json::from_value(items)?;
    let next_seq = payload
        .get("next_seq")
        .and_then(Value::as_i64)
        .unwrap_or(0);
    Ok((items, next_seq))
}

fn persist<T: Serialize>(
    snapshots: &mut SnapshotStore,
    def: StoreDef,
    items: &[T],
    next_seq: i64,
) -> Result<(), StoreError> {
    let payload = json!({
        "items": serde_json::to_value(items)?,
        "next_seq": next_seq,
    });
    snapshots.save(def.name, def.version, &payload, now_ms())
}

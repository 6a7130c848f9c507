use ct_core::{Quarter, TestingStatus};
use ct_storage::{SnapshotStore, StoreError, Tracker, stores};
use serde_json::json;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic enough for tests")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "ct-migrations-{label}-{}-{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("temp storage dir must be creatable");
    dir
}

#[test]
fn v1_controls_walk_the_whole_chain() {
    let dir = temp_dir("controls-v1");
    {
        let mut snapshots = SnapshotStore::open(&dir).expect("snapshot store should open");
        let payload = json!({
            "items": [{
                "control_id": "AC-1",
                "implementation_description": "Quarterly access reviews",
                "linked_subcategory_ids": ["PR.AA-01"],
            }],
            "next_seq": 0,
        });
        snapshots
            .save("controls", 1, &payload, 0)
            .expect("seeding a v1 payload should succeed");
    }

    let tracker = Tracker::open(&dir).expect("open should migrate v1 controls");
    let control = tracker.control("AC-1").expect("migrated control must load");
    assert_eq!(control.linked_requirement_ids, vec!["PR.AA-01"]);
    assert!(control.stakeholder_ids.is_empty());

    // The migrated payload was written back at the current version.
    let snapshots = SnapshotStore::open(&dir).expect("snapshot store should reopen");
    let snapshot = snapshots
        .load("controls")
        .expect("load should succeed")
        .expect("controls snapshot must exist");
    assert_eq!(snapshot.version, stores::CONTROLS.version);
}

#[test]
fn migration_is_monotone_across_entry_versions() {
    // A v1 payload migrated to current must match the same data entering at
    // v2, where v2 is v1 plus the stakeholder list the v2 step adds.
    let item_v1 = json!({
        "control_id": "AC-1",
        "implementation_description": "Quarterly access reviews",
        "linked_subcategory_ids": ["PR.AA-01"],
    });
    let mut item_v2 = item_v1.clone();
    item_v2
        .as_object_mut()
        .expect("item must be an object")
        .insert("stakeholder_ids".into(), json!([]));

    let mut results = Vec::new();
    for (label, version, item) in [("from-v1", 1, item_v1), ("from-v2", 2, item_v2)] {
        let mut snapshots =
            SnapshotStore::open(temp_dir(label)).expect("snapshot store should open");
        let payload = json!({ "items": [item], "next_seq": 0 });
        snapshots
            .save("controls", version, &payload, 0)
            .expect("seeding should succeed");
        let migrated = snapshots
            .load_migrated(stores::CONTROLS, 0)
            .expect("migration should succeed")
            .expect("payload must exist");
        results.push(migrated);
    }
    assert_eq!(results[0], results[1]);
}

#[test]
fn newer_snapshots_are_rejected_fail_closed() {
    let dir = temp_dir("future");
    {
        let mut snapshots = SnapshotStore::open(&dir).expect("snapshot store should open");
        snapshots
            .save("controls", 99, &json!({"items": [], "next_seq": 0}), 0)
            .expect("seeding should succeed");
    }

    let result = Tracker::open(&dir);
    assert!(matches!(
        result,
        Err(StoreError::SnapshotVersionAhead {
            store: "controls",
            persisted: 99,
            ..
        })
    ));

    // The future payload must still be there, untouched.
    let snapshots = SnapshotStore::open(&dir).expect("snapshot store should reopen");
    let snapshot = snapshots
        .load("controls")
        .expect("load should succeed")
        .expect("controls snapshot must exist");
    assert_eq!(snapshot.version, 99);
}

#[test]
fn legacy_finding_requirement_text_becomes_the_control_link() {
    let dir = temp_dir("findings-v1");
    {
        let mut snapshots = SnapshotStore::open(&dir).expect("snapshot store should open");
        let payload = json!({
            "items": [{
                "id": "fnd-000001",
                "summary": "Stale keys in use",
                "compliance_requirement": "AC-1",
            }],
            "next_seq": 1,
        });
        snapshots
            .save("findings", 1, &payload, 0)
            .expect("seeding should succeed");
    }

    let tracker = Tracker::open(&dir).expect("open should migrate v1 findings");
    let finding = tracker
        .finding("fnd-000001")
        .expect("migrated finding must load");
    assert_eq!(finding.control_id.as_deref(), Some("AC-1"));
    // The legacy text is retained; it still feeds an export column.
    assert_eq!(finding.compliance_requirement.as_deref(), Some("AC-1"));
}

#[test]
fn legacy_artifact_fields_are_folded_and_dropped() {
    let dir = temp_dir("artifacts-v1");
    {
        let mut snapshots = SnapshotStore::open(&dir).expect("snapshot store should open");
        let payload = json!({
            "items": [{
                "id": "art-000001",
                "artifact_id": "art-000001",
                "name": "Encryption policy",
                "compliance_requirement": "AC-1",
                "linked_subcategory_ids": ["PR.DS-01"],
            }],
            "next_seq": 1,
        });
        snapshots
            .save("artifacts", 1, &payload, 0)
            .expect("seeding should succeed");
    }

    let tracker = Tracker::open(&dir).expect("open should migrate v1 artifacts");
    let artifact = tracker
        .artifact("art-000001")
        .expect("migrated artifact must load");
    assert_eq!(artifact.control_id.as_deref(), Some("AC-1"));

    let snapshots = SnapshotStore::open(&dir).expect("snapshot store should reopen");
    let snapshot = snapshots
        .load("artifacts")
        .expect("load should succeed")
        .expect("artifacts snapshot must exist");
    let item = &snapshot.payload["items"][0];
    assert!(item.get("compliance_requirement").is_none());
    assert!(item.get("linked_subcategory_ids").is_none());
}

#[test]
fn quarter_objects_become_a_fixed_four_slot_array() {
    let dir = temp_dir("assessments-v1");
    {
        let mut snapshots = SnapshotStore::open(&dir).expect("snapshot store should open");
        let payload = json!({
            "items": [{
                "id": "asm-000001",
                "name": "FY25 audit",
                "scope_type": "controls",
                "scope_ids": ["AC-1"],
                "observations": {
                    "AC-1": {
                        "test_procedures": "Inspect access reviews",
                        "quarters": {
                            "Q2": {
                                "actual_score": 6.0,
                                "testing_status": "Complete",
                            },
                        },
                    },
                },
            }],
            "next_seq": 1,
        });
        snapshots
            .save("assessments", 1, &payload, 0)
            .expect("seeding should succeed");
    }

    let tracker = Tracker::open(&dir).expect("open should migrate v1 assessments");
    let observation = tracker
        .observation("asm-000001", "AC-1")
        .expect("migrated observation must load");
    assert_eq!(observation.test_procedures, "Inspect access reviews");

    let q2 = observation.quarters.get(Quarter::Q2);
    assert_eq!(q2.actual_score, 6.0);
    assert_eq!(q2.testing_status, TestingStatus::Complete);
    for quarter in [Quarter::Q1, Quarter::Q3, Quarter::Q4] {
        assert_eq!(
            observation.quarters.get(quarter).testing_status,
            TestingStatus::NotStarted
        );
    }
}

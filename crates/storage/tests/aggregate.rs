use ct_storage::{ArtifactCreateRequest, ControlCreateRequest, FindingCreateRequest, Tracker};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic enough for tests")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "ct-aggregate-{label}-{}-{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("temp storage dir must be creatable");
    dir
}

#[test]
fn many_controls_fold_into_one_requirement_view() {
    let mut tracker = Tracker::open(temp_dir("fold")).expect("fresh storage should open");
    tracker
        .control_create(ControlCreateRequest {
            control_id: "AC-1".into(),
            implementation_description: "Quarterly access reviews".into(),
            owner: Some("Amy Lee <amy@x.com>".into()),
            linked_requirement_ids: vec!["PR.AA-01".into()],
            ..Default::default()
        })
        .expect("control creation should succeed");
    tracker
        .control_create(ControlCreateRequest {
            control_id: "AC-2".into(),
            implementation_description: "Central identity provider".into(),
            owner: Some("Bob Kim <bob@x.com>".into()),
            stakeholders: vec!["Amy Lee <amy@x.com>".into()],
            linked_requirement_ids: vec!["PR.AA-01".into()],
            ..Default::default()
        })
        .expect("control creation should succeed");

    let rollup = tracker.requirement_rollup("PR.AA-01");
    assert_eq!(
        rollup.implementation,
        "Quarterly access reviews | Central identity provider"
    );
    assert_eq!(rollup.owner_names, vec!["Amy Lee", "Bob Kim"]);
    assert_eq!(rollup.stakeholder_names, vec!["Amy Lee"]);

    // Folding is idempotent: the same call yields the same view.
    assert_eq!(tracker.requirement_rollup("PR.AA-01"), rollup);
}

#[test]
fn rollup_collects_artifacts_and_findings_through_controls() {
    let mut tracker = Tracker::open(temp_dir("evidence")).expect("fresh storage should open");
    tracker
        .control_create(ControlCreateRequest {
            control_id: "AC-1".into(),
            linked_requirement_ids: vec!["PR.DS-01".into()],
            ..Default::default()
        })
        .expect("control creation should succeed");
    let artifact = tracker
        .artifact_create(ArtifactCreateRequest {
            name: "Encryption policy".into(),
            control_id: Some("AC-1".into()),
            ..Default::default()
        })
        .expect("artifact creation should succeed");
    let finding = tracker
        .finding_create(FindingCreateRequest {
            summary: "Stale keys in use".into(),
            control_id: Some("AC-1".into()),
            ..Default::default()
        })
        .expect("finding creation should succeed");

    let rollup = tracker.requirement_rollup("PR.DS-01");
    assert_eq!(rollup.artifact_ids, vec![artifact.id]);
    assert_eq!(rollup.finding_ids, vec![finding.id]);
}

#[test]
fn zero_links_fall_back_to_the_same_named_control() {
    let mut tracker = Tracker::open(temp_dir("legacy")).expect("fresh storage should open");
    tracker
        .control_create(ControlCreateRequest {
            control_id: "PR.PS-01".into(),
            implementation_description: "Hardened baselines".into(),
            ..Default::default()
        })
        .expect("control creation should succeed");

    let rollup = tracker.requirement_rollup("PR.PS-01");
    assert_eq!(rollup.implementation, "Hardened baselines");

    // An explicit link elsewhere wins over the naming fallback.
    tracker
        .control_create(ControlCreateRequest {
            control_id: "AC-9".into(),
            implementation_description: "Baseline scanner".into(),
            linked_requirement_ids: vec!["PR.PS-01".into()],
            ..Default::default()
        })
        .expect("control creation should succeed");
    let rollup = tracker.requirement_rollup("PR.PS-01");
    assert_eq!(rollup.implementation, "Baseline scanner");
}

#[test]
fn unlinked_requirement_rolls_up_empty() {
    let tracker = Tracker::open(temp_dir("empty")).expect("fresh storage should open");
    let rollup = tracker.requirement_rollup("RC.RP-01");
    assert!(rollup.implementation.is_empty());
    assert!(rollup.owner_names.is_empty());
    assert!(rollup.artifact_ids.is_empty());
}

#[test]
fn duplicate_and_blank_descriptions_collapse() {
    let mut tracker = Tracker::open(temp_dir("dedupe")).expect("fresh storage should open");
    for control_id in ["AC-1", "AC-2"] {
        tracker
            .control_create(ControlCreateRequest {
                control_id: control_id.into(),
                implementation_description: "Shared description".into(),
                owner: Some("Amy Lee <amy@x.com>".into()),
                linked_requirement_ids: vec!["GV.PO-01".into()],
                ..Default::default()
            })
            .expect("control creation should succeed");
    }
    tracker
        .control_create(ControlCreateRequest {
            control_id: "AC-3".into(),
            implementation_description: "   ".into(),
            linked_requirement_ids: vec!["GV.PO-01".into()],
            ..Default::default()
        })
        .expect("control creation should succeed");

    let rollup = tracker.requirement_rollup("GV.PO-01");
    assert_eq!(rollup.implementation, "Shared description");
    assert_eq!(rollup.owner_names, vec!["Amy Lee"]);
}

#[test]
fn reverse_lookup_filters_dangling_requirement_ids() {
    let mut tracker = Tracker::open(temp_dir("reverse")).expect("fresh storage should open");
    tracker
        .control_create(ControlCreateRequest {
            control_id: "AC-1".into(),
            linked_requirement_ids: vec!["GV.OC-01".into(), "no-such-req".into()],
            ..Default::default()
        })
        .expect("control creation should succeed");

    let requirements = tracker.requirements_for_control("AC-1");
    assert_eq!(requirements.len(), 1);
    assert_eq!(requirements[0].id, "GV.OC-01");
}

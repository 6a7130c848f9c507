use ct_storage::{ArtifactCreateRequest, FindingCreateRequest, Tracker};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic enough for tests")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "ct-jira-{label}-{}-{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("temp storage dir must be creatable");
    dir
}

#[test]
fn artifact_export_carries_the_fixed_jira_columns() {
    let mut tracker = Tracker::open(temp_dir("artifact-export")).expect("fresh storage should open");
    tracker
        .artifact_create(ArtifactCreateRequest {
            name: "Encryption policy".into(),
            link: "https://wiki.internal/policy".into(),
            artifact_type: "Policy".into(),
            control_id: Some("AC-1".into()),
            linked_evaluation_ids: vec!["asm-000001".into()],
            ..Default::default()
        })
        .expect("artifact creation should succeed");

    let exported = tracker
        .artifacts_export_csv()
        .expect("export should succeed");
    let mut lines = exported.lines();
    assert_eq!(
        lines.next(),
        Some(
            "Summary,Issue Type,Project key,Custom field (Link),Custom field (Control ID),\
             Custom field (Linked Evaluation IDs),Custom field (Artifact Type),Description"
        )
    );
    let row = lines.next().expect("export must carry one row");
    assert!(row.starts_with("Encryption policy,Artifact,AR,"));
}

#[test]
fn artifact_import_appends_with_generated_ids() {
    let mut tracker = Tracker::open(temp_dir("artifact-import")).expect("fresh storage should open");
    let csv = "\
Summary,Issue Type,Project key,Custom field (Link),Custom field (Control ID),Custom field (Linked Evaluation IDs),Custom field (Artifact Type),Description
Encryption policy,Artifact,AR,https://wiki.internal/policy,AC-1,asm-000001; asm-000002,Policy,Current policy text
Access review log,Artifact,AR,,AC-1,,Log,
";
    let report = tracker
        .artifacts_import_csv(csv)
        .expect("import should succeed");
    assert_eq!(report.inserted, 2);

    let artifact = tracker
        .artifacts()
        .iter()
        .find(|a| a.name == "Encryption policy")
        .expect("imported artifact must exist");
    assert!(artifact.id.starts_with("art-"));
    assert_eq!(artifact.control_id.as_deref(), Some("AC-1"));
    assert_eq!(
        artifact.linked_evaluation_ids,
        vec!["asm-000001".to_string(), "asm-000002".to_string()]
    );

    // Importing again appends again: artifact rows carry no natural key.
    let report = tracker
        .artifacts_import_csv(csv)
        .expect("re-import should succeed");
    assert_eq!(report.inserted, 2);
    assert_eq!(tracker.artifacts().len(), 4);
}

#[test]
fn finding_defaults_fill_blank_status_and_priority() {
    let mut tracker = Tracker::open(temp_dir("finding-defaults")).expect("fresh storage should open");
    let finding = tracker
        .finding_create(FindingCreateRequest {
            summary: "Stale keys in use".into(),
            ..Default::default()
        })
        .expect("finding creation should succeed");
    assert_eq!(finding.status, "Open");
    assert_eq!(finding.priority, "Medium");
    assert!(finding.id.starts_with("fnd-"));
}

#[test]
fn finding_import_resolves_the_assignee() {
    let mut tracker = Tracker::open(temp_dir("finding-import")).expect("fresh storage should open");
    let csv = "\
Summary,Issue Type,Project key,Priority,Assignee,Due date,Custom field (Compliance Requirement),Custom field (Control ID),Custom field (Root Cause),Custom field (Remediation Action Plan),Custom field (Status),Custom field (Linked Artifacts),Description
Stale keys in use,Finding,FND,High,amy@x.com,2026-09-30,PR.DS-01,AC-1,No rotation schedule,Adopt rotation policy,In Remediation,art-000001,Stale keys in use
Missing review evidence,Finding,FND,,amy@x.com,,,,,,,,
";
    let report = tracker
        .findings_import_csv(csv)
        .expect("import should succeed");
    assert_eq!(report.inserted, 2);
    assert_eq!(tracker.users().len(), 1);

    let finding = tracker
        .findings()
        .iter()
        .find(|f| f.summary == "Stale keys in use")
        .expect("imported finding must exist");
    assert_eq!(finding.priority, "High");
    assert_eq!(finding.status, "In Remediation");
    assert_eq!(finding.compliance_requirement.as_deref(), Some("PR.DS-01"));
    assert_eq!(finding.control_id.as_deref(), Some("AC-1"));

    let sparse = tracker
        .findings()
        .iter()
        .find(|f| f.summary == "Missing review evidence")
        .expect("imported finding must exist");
    assert_eq!(sparse.status, "Open");
    assert_eq!(sparse.priority, "Medium");
    assert!(sparse.control_id.is_none());
}

#[test]
fn finding_export_keeps_the_legacy_requirement_column() {
    let mut tracker = Tracker::open(temp_dir("finding-export")).expect("fresh storage should open");
    tracker
        .finding_create(FindingCreateRequest {
            summary: "Stale keys in use".into(),
            control_id: Some("AC-1".into()),
            compliance_requirement: Some("PR.DS-01".into()),
            remediation_owner: Some("Amy Lee <amy@x.com>".into()),
            ..Default::default()
        })
        .expect("finding creation should succeed");

    let exported = tracker
        .findings_export_csv()
        .expect("export should succeed");
    let header = exported.lines().next().expect("export must carry a header");
    assert!(header.contains("Custom field (Compliance Requirement)"));
    assert!(header.contains("Custom field (Control ID)"));
    let row = exported.lines().nth(1).expect("export must carry one row");
    // Jira wants the assignee as a bare address when one is known.
    assert!(row.contains("amy@x.com"));
    assert!(row.contains("PR.DS-01"));
}

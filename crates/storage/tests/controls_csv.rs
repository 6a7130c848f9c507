use ct_storage::{ControlCreateRequest, StoreError, Tracker};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic enough for tests")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "ct-controls-{label}-{}-{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("temp storage dir must be creatable");
    dir
}

const IMPORT: &str = "\
Control ID,Control Implementation Description,Control Owner ID,Stakeholder IDs,Linked Requirements
AC-1,Quarterly access reviews,Amy Lee <amy@x.com>,Bob Kim <bob@x.com>; Amy Lee <amy@x.com>,GV.OC-01; ID.AM-01
AC-2,\"Logging, centralised\",Amy Lee <amy@x.com>,,DE.CM-01
";

#[test]
fn shared_owner_rows_resolve_to_one_user() {
    let mut tracker = Tracker::open(temp_dir("shared-owner")).expect("fresh storage should open");

    let report = tracker
        .controls_import_csv(IMPORT)
        .expect("import should succeed");
    assert_eq!(report.inserted, 2);
    assert_eq!(report.skipped, 0);

    // Amy owns both controls and appears once as a stakeholder; one record.
    let amy: Vec<_> = tracker
        .users()
        .iter()
        .filter(|u| u.email.as_deref() == Some("amy@x.com"))
        .collect();
    assert_eq!(amy.len(), 1);
    let amy_id = amy[0].id.clone();
    for control_id in ["AC-1", "AC-2"] {
        let control = tracker.control(control_id).expect("imported control must exist");
        assert_eq!(control.owner_id.as_ref(), Some(&amy_id));
    }

    let ac1 = tracker.control("AC-1").expect("imported control must exist");
    assert_eq!(ac1.stakeholder_ids.len(), 2);
    assert_eq!(
        ac1.linked_requirement_ids,
        vec!["GV.OC-01".to_string(), "ID.AM-01".to_string()]
    );
}

#[test]
fn import_appends_and_skips_existing_keys() {
    let mut tracker = Tracker::open(temp_dir("append-only")).expect("fresh storage should open");
    tracker
        .control_create(ControlCreateRequest {
            control_id: "AC-1".into(),
            implementation_description: "Original description".into(),
            ..Default::default()
        })
        .expect("control creation should succeed");

    let report = tracker
        .controls_import_csv(IMPORT)
        .expect("import should succeed");
    assert_eq!(report.inserted, 1);
    assert_eq!(report.skipped, 1);

    // The existing row was not merged over.
    let ac1 = tracker.control("AC-1").expect("control must exist");
    assert_eq!(ac1.implementation_description, "Original description");
    assert!(ac1.owner_id.is_none());

    // Re-importing the same file inserts nothing.
    let again = tracker
        .controls_import_csv(IMPORT)
        .expect("import should succeed");
    assert_eq!(again.inserted, 0);
    assert_eq!(again.skipped, 2);
}

#[test]
fn rows_without_a_key_are_counted_skipped() {
    let mut tracker = Tracker::open(temp_dir("keyless")).expect("fresh storage should open");
    let csv = "\
Control ID,Control Implementation Description,Control Owner ID,Stakeholder IDs,Linked Requirements
,Missing key,,,
AC-9,Present,,,
";
    let report = tracker
        .controls_import_csv(csv)
        .expect("import should succeed");
    assert_eq!(report.inserted, 1);
    assert_eq!(report.skipped, 1);
}

#[test]
fn export_round_trips_through_import() {
    let mut tracker = Tracker::open(temp_dir("round-trip")).expect("fresh storage should open");
    tracker
        .controls_import_csv(IMPORT)
        .expect("import should succeed");
    let exported = tracker
        .controls_export_csv()
        .expect("export should succeed");
    assert!(exported.starts_with(
        "Control ID,Control Implementation Description,Control Owner ID,Stakeholder IDs,Linked Requirements"
    ));
    assert!(exported.contains("\"Logging, centralised\""));

    let mut fresh = Tracker::open(temp_dir("round-trip-dst")).expect("fresh storage should open");
    let report = fresh
        .controls_import_csv(&exported)
        .expect("re-import should succeed");
    assert_eq!(report.inserted, 2);

    let original = tracker.control("AC-1").expect("control must exist");
    let copied = fresh.control("AC-1").expect("re-imported control must exist");
    assert_eq!(
        copied.implementation_description,
        original.implementation_description
    );
    assert_eq!(
        copied.linked_requirement_ids,
        original.linked_requirement_ids
    );
    assert_eq!(
        fresh.user_export_string(copied.owner_id.as_ref()),
        "Amy Lee <amy@x.com>"
    );
}

#[test]
fn creation_rejects_blank_and_duplicate_keys() {
    let mut tracker = Tracker::open(temp_dir("validation")).expect("fresh storage should open");

    let blank = tracker.control_create(ControlCreateRequest {
        control_id: "   ".into(),
        ..Default::default()
    });
    assert!(matches!(blank, Err(StoreError::InvalidInput(_))));

    tracker
        .control_create(ControlCreateRequest {
            control_id: "AC-1".into(),
            ..Default::default()
        })
        .expect("control creation should succeed");
    let duplicate = tracker.control_create(ControlCreateRequest {
        control_id: "AC-1".into(),
        ..Default::default()
    });
    assert!(matches!(
        duplicate,
        Err(StoreError::DuplicateKey { field: "control_id", .. })
    ));
}

#[test]
fn imported_controls_survive_reopen() {
    let dir = temp_dir("persist");
    {
        let mut tracker = Tracker::open(&dir).expect("fresh storage should open");
        tracker
            .controls_import_csv(IMPORT)
            .expect("import should succeed");
    }
    let tracker = Tracker::open(&dir).expect("reopen should succeed");
    assert_eq!(tracker.controls().len(), 2);
    assert!(tracker.control("AC-2").is_some());
}

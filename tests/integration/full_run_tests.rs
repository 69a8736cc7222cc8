//! Full run integration tests.
//!
//! Snapshot files through validation, summary, and baseline round trips.

use crate::mocks::workloads::*;
use podguard::data::snapshot::{load_snapshot, load_snapshots};
use podguard::engine::result::{compare_to_baseline, load_baseline, save_baseline};
use podguard::{validate_snapshot, FindingStatus, PodguardError, RuleCategory, ValidatorConfig};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_pod_listing_yaml_end_to_end() {
    let file = write_temp(".yaml", POD_LISTING_YAML);
    let snapshot = load_snapshot(file.path()).unwrap();
    let report = validate_snapshot(&ValidatorConfig::default(), &snapshot).unwrap();

    assert_eq!(report.workloads.len(), 2);
    assert_eq!(report.workloads[0].name, "frontend-6d4b");
    assert!(report.workloads[0]
        .findings
        .iter()
        .all(|f| f.status == FindingStatus::Pass));

    let backend = &report.workloads[1];
    assert_eq!(backend.finding("registry-whitelist").unwrap().status, FindingStatus::Fail);
    assert_eq!(backend.finding("non-root-user").unwrap().status, FindingStatus::Fail);
    assert_eq!(backend.finding("readonly-filesystem").unwrap().status, FindingStatus::Warning);

    let summary = report.summary();
    assert_eq!(summary.critical_workloads, 1);
    assert_eq!(summary.healthy_workloads, 1);
    assert_eq!(summary.exit_code(), 1);
}

#[test]
fn test_multiple_files_merge_in_order() {
    let yaml = write_temp(".yml", POD_LISTING_YAML);
    let json = write_temp(".json", POD_LIST_JSON);

    let snapshot = load_snapshots(&[json.path(), yaml.path()]).unwrap();
    let names: Vec<&str> = snapshot.workloads.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["cache-0", "frontend-6d4b", "backend-9f2c"]);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = load_snapshot(&dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(PodguardError::Io { .. })));
}

#[test]
fn test_mistyped_posture_is_parse_error_not_missing_identity() {
    let file = write_temp(
        ".json",
        r#"{"pods": [{"name": "api-1", "namespace": "prod", "image": "gcr.io/a:1",
                      "securityContext": {"runAsNonRoot": "yes"}}]}"#,
    );
    match load_snapshot(file.path()) {
        Err(PodguardError::Parse { message, .. }) => assert!(message.starts_with("pods[0]: "), "{}", message),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_malformed_shapes_are_rejected() {
    for content in [r#"{"pods": null}"#, r#"["a", "b", "c"]"#, r#"{"podsInfo": {"name": "a"}}"#, "42"] {
        let file = write_temp(".json", content);
        assert!(
            matches!(load_snapshot(file.path()), Err(PodguardError::Parse { .. })),
            "accepted {}",
            content
        );
    }
}

#[test]
fn test_workload_without_name_aborts_run() {
    let file = write_temp(".json", r#"[{"namespace": "x", "image": "gcr.io/a:1"}]"#);
    let snapshot = load_snapshot(file.path()).unwrap();
    let result = validate_snapshot(&ValidatorConfig::default(), &snapshot);
    assert!(matches!(result, Err(PodguardError::MissingIdentity { field: "name" })));
}

#[test]
fn test_category_filter_narrows_reports() {
    let config = ValidatorConfig {
        categories: Some(vec![RuleCategory::Cost, RuleCategory::Reliability]),
        ..Default::default()
    };
    let report = validate_snapshot(&config, &mixed_snapshot()).unwrap();

    assert_eq!(report.rules.len(), 2);
    for workload in &report.workloads {
        assert_eq!(workload.findings.len(), 2);
    }
}

#[test]
fn test_baseline_round_trip_and_compare() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("baseline.json");

    let baseline = validate_snapshot(&ValidatorConfig::default(), &mixed_snapshot()).unwrap();
    save_baseline(&baseline, &path).unwrap();
    let loaded = load_baseline(&path).unwrap();
    assert_eq!(loaded, baseline);

    // the risky pod gets fixed, the compliant one regresses to root
    let mut snapshot = mixed_snapshot();
    snapshot.workloads[0].security_context = None;
    snapshot.workloads[1] = compliant_pod("backend-2");
    snapshot.workloads[1].namespace = "staging".to_string();

    let current = validate_snapshot(&ValidatorConfig::default(), &snapshot).unwrap();
    let cmp = compare_to_baseline(&current, &loaded);

    assert!(cmp.regressions.contains(&"production/frontend-1:non-root-user".to_string()));
    assert!(cmp.new_warnings.contains(&"production/frontend-1:readonly-filesystem".to_string()));
    assert!(cmp.resolved.contains(&"staging/backend-2:registry-whitelist".to_string()));
    assert!(cmp.resolved.contains(&"staging/backend-2:resource-requests".to_string()));
    assert!(cmp.has_regressions());
}

#[test]
fn test_load_baseline_rejects_garbage() {
    let file = write_temp(".json", "not json");
    assert!(matches!(load_baseline(file.path()), Err(PodguardError::Parse { .. })));
}

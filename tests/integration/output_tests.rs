//! Output formatting tests.
//!
//! Tests for terminal, JSON, and JUnit XML output formatters.

use crate::mocks::workloads::*;
use podguard::cli::args::OutputFormat;
use podguard::cli::output::{get_formatter, JsonFormatter, JunitFormatter, OutputFormatter, TerminalFormatter};
use podguard::data::snapshot::ClusterSnapshot;
use podguard::engine::result::{compare_to_baseline, FleetReport};
use podguard::{validate_snapshot, ValidatorConfig};

fn create_sample_report() -> FleetReport {
    let mut report = validate_snapshot(&ValidatorConfig::default(), &mixed_snapshot()).unwrap();
    report.timestamp = 1733500000;
    report
}

fn create_empty_report() -> FleetReport {
    validate_snapshot(&ValidatorConfig::default(), &ClusterSnapshot::default()).unwrap()
}

fn create_all_pass_report() -> FleetReport {
    let snapshot = ClusterSnapshot::new(vec![compliant_pod("a"), compliant_pod("b")]);
    validate_snapshot(&ValidatorConfig::default(), &snapshot).unwrap()
}

// Terminal formatter tests

#[test]
fn test_terminal_formatter_basic() {
    let formatter = TerminalFormatter::new(false, false, false);
    let output = formatter.format(&create_sample_report(), None).unwrap();

    assert!(output.contains("podguard validation report"));
    assert!(output.contains("Workloads: 4"));
    assert!(output.contains("2024-12-06T15:46:40Z"));
    assert!(output.contains("SUMMARY"));
}

#[test]
fn test_terminal_formatter_contains_findings() {
    let formatter = TerminalFormatter::new(false, false, false);
    let output = formatter.format(&create_sample_report(), None).unwrap();

    assert!(output.contains("production/frontend-1 [OK]"));
    assert!(output.contains("staging/backend-2 [CRITICAL]"));
    assert!(output.contains("monitoring/exporter-4 [WARNING]"));
    assert!(output.contains("[PASS]"));
    assert!(output.contains("[WARN]"));
    assert!(output.contains("[FAIL]"));
    assert!(output.contains("Allowed registry (registry-whitelist, high)"));
}

#[test]
fn test_terminal_formatter_summary() {
    let formatter = TerminalFormatter::new(false, false, false);
    let output = formatter.format(&create_sample_report(), None).unwrap();

    assert!(output.contains("4 workloads (2 critical, 1 warning, 1 ok)"));
    assert!(output.contains("Exit code: 1 (failures detected)"));
}

#[test]
fn test_terminal_formatter_verbose_shows_details() {
    let quiet = TerminalFormatter::new(false, false, false)
        .format(&create_sample_report(), None)
        .unwrap();
    let verbose = TerminalFormatter::new(false, true, false)
        .format(&create_sample_report(), None)
        .unwrap();

    assert!(!quiet.contains("CPU: 500m, Memory: 512Mi"));
    assert!(verbose.contains("CPU: 500m, Memory: 512Mi"));
    assert!(verbose.contains("unauthorized-registry.example.com/staging/backend-2:v9"));
}

#[test]
fn test_terminal_formatter_quiet_hides_healthy() {
    let formatter = TerminalFormatter::new(false, false, true);
    let output = formatter.format(&create_sample_report(), None).unwrap();

    assert!(!output.contains("production/frontend-1"));
    assert!(output.contains("staging/backend-2"));
    assert!(!output.contains("[PASS]"));
}

#[test]
fn test_terminal_formatter_no_color() {
    let output = TerminalFormatter::new(false, false, false)
        .format(&create_sample_report(), None)
        .unwrap();
    assert!(!output.contains("\x1b["));
}

#[test]
fn test_terminal_formatter_all_pass() {
    let output = TerminalFormatter::new(false, false, false)
        .format(&create_all_pass_report(), None)
        .unwrap();
    assert!(output.contains("Exit code: 0 (all rules passed)"));
}

#[test]
fn test_terminal_formatter_comparison() {
    let baseline = create_all_pass_report();
    let current = validate_snapshot(
        &ValidatorConfig::default(),
        &ClusterSnapshot::new(vec![compliant_pod("a"), risky_pod("b")]),
    )
    .unwrap();
    let cmp = compare_to_baseline(&current, &baseline);

    let output = TerminalFormatter::new(false, false, false)
        .format(&current, Some(&cmp))
        .unwrap();
    assert!(output.contains("BASELINE COMPARISON"));
    assert!(output.contains("New failures: 2"));
    assert!(output.contains("    - staging/b:registry-whitelist"));
}

#[test]
fn test_terminal_formatter_empty_report() {
    let output = TerminalFormatter::new(false, false, false)
        .format(&create_empty_report(), None)
        .unwrap();
    assert!(output.contains("Workloads: 0"));
    assert!(output.contains("0 workloads"));
}

// JSON formatter tests

#[test]
fn test_json_formatter_valid_json() {
    let output = JsonFormatter::new(true).format(&create_sample_report(), None).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["timestamp"], 1733500000);
    assert_eq!(value["summary"]["workloads"], 4);
    assert_eq!(value["rules"].as_array().unwrap().len(), 5);
    assert_eq!(value["workloads"][1]["podName"], "backend-2");
    assert_eq!(value["workloads"][1]["status"], "critical");
    assert_eq!(value["workloads"][1]["validations"][0]["ruleId"], "registry-whitelist");
    assert_eq!(value["workloads"][1]["validations"][0]["status"], "fail");
    assert!(value.get("comparison").is_none());
}

#[test]
fn test_json_formatter_compact() {
    let output = JsonFormatter::new(false).format(&create_sample_report(), None).unwrap();
    assert!(!output.contains('\n'));
}

#[test]
fn test_json_output_reloads_as_report() {
    let report = create_sample_report();
    let output = JsonFormatter::new(true).format(&report, None).unwrap();
    let reloaded: FleetReport = serde_json::from_str(&output).unwrap();
    assert_eq!(reloaded, report);
}

#[test]
fn test_json_formatter_empty_report() {
    let output = JsonFormatter::new(true).format(&create_empty_report(), None).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert!(value["workloads"].as_array().unwrap().is_empty());
}

// JUnit formatter tests

#[test]
fn test_junit_formatter_structure() {
    let output = JunitFormatter::new().format(&create_sample_report(), None).unwrap();

    assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(output.contains("<testsuites name=\"podguard\" tests=\"20\" failures=\"3\""));
    assert!(output.contains("<testsuite name=\"staging/backend-2\" tests=\"5\" failures=\"2\""));
    assert!(output.contains("classname=\"podguard.staging.backend-2\""));
    assert!(output.contains("<failure message=\"Container runs as root\" type=\"high\">"));
    assert!(output.contains("<system-out>WARNING: Root filesystem is writable</system-out>"));
    assert!(output.ends_with("</testsuites>"));
}

#[test]
fn test_junit_formatter_empty_report() {
    let output = JunitFormatter::new().format(&create_empty_report(), None).unwrap();
    assert!(output.contains("tests=\"0\""));
    assert!(!output.contains("<testsuite "));
}

#[test]
fn test_get_formatter() {
    let report = create_sample_report();
    let text = get_formatter(OutputFormat::Text, false, false, false)
        .format(&report, None)
        .unwrap();
    let json = get_formatter(OutputFormat::Json, false, false, false)
        .format(&report, None)
        .unwrap();
    let junit = get_formatter(OutputFormat::Junit, false, false, false)
        .format(&report, None)
        .unwrap();

    assert!(text.contains("SUMMARY"));
    assert!(json.starts_with('{'));
    assert!(junit.starts_with("<?xml"));
}

//! Integration tests for `traffic-audit audit`

mod common;

use common::{fixtures, get_bin, stdout_json};
use predicates::prelude::*;
use std::path::Path;

fn audit(root: &Path) -> assert_cmd::Command {
    let mut cmd = get_bin();
    cmd.arg("--root").arg(root).arg("audit");
    cmd
}

#[test]
fn test_metric_claim_matches_report() {
    let project = fixtures::create_project().expect("Failed to create project");

    audit(project.path())
        .args(["metric", "visits_organic=150", "--source", "summary.json"])
        .args(["--client", fixtures::CLIENT, "--period", "Feb 2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED"))
        .stdout(predicate::str::contains("visits_organic = 150 (Feb 2025)"));
}

#[test]
fn test_text_claim_matches_report() {
    let project = fixtures::create_project().expect("Failed to create project");

    audit(project.path())
        .args(["metric", "top_source=Search engine traffic", "--source", "summary.json"])
        .args(["--client", fixtures::CLIENT])
        .assert()
        .success();
}

#[test]
fn test_metric_mismatch_fails() {
    let project = fixtures::create_project().expect("Failed to create project");

    audit(project.path())
        .args(["metric", "visits_organic=160", "--source", "summary.json"])
        .args(["--client", fixtures::CLIENT])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Value mismatch: claimed 160, source has 150",
        ))
        .stderr(predicate::str::contains("Audit did not pass"));
}

#[test]
fn test_metric_missing_source_file_fails() {
    let project = fixtures::create_project().expect("Failed to create project");

    audit(project.path())
        .args(["metric", "visits=1", "--source", "missing.json"])
        .args(["--client", fixtures::CLIENT])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Source file not found: missing.json"));
}

#[test]
fn test_metric_without_value_is_usage_error() {
    let project = fixtures::create_project().expect("Failed to create project");

    audit(project.path())
        .args(["metric", "visits_organic", "--source", "summary.json"])
        .args(["--client", fixtures::CLIENT])
        .assert()
        .code(64);
}

#[test]
fn test_calc_passes_within_tolerance() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");

    audit(temp_dir.path())
        .args(["calc", "40.005", "100", "140", "--op", "pct_change"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED"));
}

#[test]
fn test_calc_error_reports_expected_value() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");

    audit(temp_dir.path())
        .args(["calc", "50", "100", "140", "--op", "pct_change"])
        .args(["--description", "organic growth"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("organic growth = 50"))
        .stdout(predicate::str::contains(
            "Calculation error: expected 40.00, got 50.00",
        ));
}

#[test]
fn test_calc_negative_delta() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");

    audit(temp_dir.path())
        .args(["calc", "-20", "120", "100", "--op", "delta"])
        .assert()
        .success();
}

#[test]
fn test_calc_unknown_operation_fails() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");

    audit(temp_dir.path())
        .args(["calc", "5", "2", "3", "--op", "median"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Unknown operation: median"));
}

#[test]
fn test_cross_ref_deviation_is_warning() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");

    audit(temp_dir.path())
        .args(["cross-ref", "visits", "metrika=1000", "gsc=800"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"))
        .stdout(predicate::str::contains(
            "Large deviation between sources: 25.0% (values: [1000, 800])",
        ));
}

#[test]
fn test_cross_ref_close_values_pass() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");

    audit(temp_dir.path())
        .args(["cross-ref", "visits", "metrika=1000", "gsc=950"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED"));
}

#[test]
fn test_cross_ref_rejects_malformed_reading() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");

    audit(temp_dir.path())
        .args(["cross-ref", "visits", "metrika:1000"])
        .assert()
        .code(64);
}

#[test]
fn test_hypothesis_with_growth_wording_lists_alternatives() {
    let project = fixtures::create_project().expect("Failed to create project");

    audit(project.path())
        .args(["hypothesis", "Organic growth after the migration"])
        .args(["--client", fixtures::CLIENT])
        .args(["--data", "visits_organic=150@summary.json"])
        .args(["--data", "visits_total=170@summary.json"])
        .args(["--data", "top_source=Search engine traffic@summary.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"))
        .stdout(predicate::str::contains("Seasonal activity peak"))
        .stdout(predicate::str::contains("confidence 65%"));
}

#[test]
fn test_hypothesis_language_override() {
    let project = fixtures::create_project().expect("Failed to create project");

    audit(project.path())
        .args(["hypothesis", "Рост трафика из поиска"])
        .args(["--client", fixtures::CLIENT, "--lang", "ru"])
        .args(["--data", "visits_organic=150@summary.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Сезонный пик активности"));
}

#[test]
fn test_neutral_hypothesis_passes() {
    let project = fixtures::create_project().expect("Failed to create project");

    audit(project.path())
        .args(["hypothesis", "Search dominates the traffic mix"])
        .args(["--client", fixtures::CLIENT])
        .args(["--data", "visits_organic=150@summary.json"])
        .args(["--data", "visits_total=170@summary.json"])
        .args(["--data", "top_source=Search engine traffic@summary.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED"));
}

#[test]
fn test_hypothesis_without_data_fails() {
    let project = fixtures::create_project().expect("Failed to create project");

    audit(project.path())
        .args(["hypothesis", "Traffic mix is stable"])
        .args(["--client", fixtures::CLIENT])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No supporting data for hypothesis"));
}

#[test]
fn test_data_audit_requires_workbooks() {
    let project = fixtures::create_project().expect("Failed to create project");

    audit(project.path())
        .args(["data", fixtures::CLIENT])
        .args(fixtures::P2)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Cache directory not found"))
        .stdout(predicate::str::contains(
            "Missing workbook: analysis_sources_*2025020120250228*.json",
        ));
}

#[test]
fn test_data_audit_after_comparisons() {
    let project = fixtures::create_project().expect("Failed to create project");

    for kind in ["sources", "pages"] {
        get_bin()
            .arg("--root")
            .arg(project.path())
            .args(["compare", kind, fixtures::CLIENT])
            .args(fixtures::P1)
            .args(fixtures::P2)
            .assert()
            .success();
    }

    // Either period of the comparison is covered
    for period in [fixtures::P1, fixtures::P2] {
        audit(project.path())
            .args(["data", fixtures::CLIENT])
            .args(period)
            .assert()
            .success()
            .stdout(predicate::str::contains("PASSED"));
    }

    audit(project.path())
        .args(["data", fixtures::CLIENT, "2025-03-01", "2025-03-31"])
        .assert()
        .code(1);
}

const PLAN: &str = r#"{
    "data_points": [
        {"metric": "visits_organic", "value": 150, "source_file": "summary.json", "period": "Feb"}
    ],
    "calculations": [
        {"result": 70, "operands": [100, 170], "operation": "pct_change", "description": "total growth"}
    ],
    "cross_references": [
        {"metric": "visits", "sources": [
            {"label": "metrika", "value": 1000},
            {"label": "gsc", "value": 800}
        ]}
    ]
}"#;

fn write_plan(root: &Path, contents: &str) -> std::path::PathBuf {
    let path = root.join("plan.json");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_run_plan_passes_with_warnings() {
    let project = fixtures::create_project().expect("Failed to create project");
    let plan = write_plan(project.path(), PLAN);

    audit(project.path())
        .arg("run")
        .arg(&plan)
        .args(["--client", fixtures::CLIENT])
        .assert()
        .success()
        .stdout(predicate::str::contains("Running 3 checks"))
        .stdout(predicate::str::contains("Audit summary for acme"))
        .stdout(predicate::str::contains("Warnings:   1"));
}

#[test]
fn test_run_plan_strict_fails_on_warnings() {
    let project = fixtures::create_project().expect("Failed to create project");
    let plan = write_plan(project.path(), PLAN);

    audit(project.path())
        .arg("run")
        .arg(&plan)
        .args(["--client", fixtures::CLIENT, "--strict"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("0 failed, 1 warning(s)"));
}

#[test]
fn test_run_plan_json_summary() {
    let project = fixtures::create_project().expect("Failed to create project");
    let plan = write_plan(project.path(), PLAN);

    let output = audit(project.path())
        .arg("run")
        .arg(&plan)
        .args(["--client", fixtures::CLIENT, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);

    let summary = stdout_json(&output);
    assert_eq!(summary["client"], "acme");
    assert_eq!(summary["total_checks"], 3);
    assert_eq!(summary["passed"], 2);
    assert_eq!(summary["warnings"], 1);
    assert_eq!(summary["failed"], 0);
    assert_eq!(summary["details"][0]["status"], "warning");
    assert!(summary["run_id"].as_str().is_some_and(|id| id.len() == 36));
}

#[test]
fn test_run_missing_plan_is_io_error() {
    let project = fixtures::create_project().expect("Failed to create project");

    audit(project.path())
        .args(["run", "nope.json", "--client", fixtures::CLIENT])
        .assert()
        .code(74);
}

#[test]
fn test_checklist_in_english() {
    get_bin()
        .args(["audit", "checklist", "traffic", "--lang", "en"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Do all traffic sources have Metrika data?"));
}

#[test]
fn test_checklist_defaults_to_russian() {
    get_bin()
        .args(["audit", "checklist", "conversion"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Все цели настроены в Метрике?"));
}

#[test]
fn test_unknown_checklist_lists_types() {
    get_bin()
        .args(["audit", "checklist", "budget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("traffic, conversion, seo, hypothesis"));
}

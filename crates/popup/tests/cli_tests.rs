//! Integration tests for the `datasource-popup` binary.

mod common;

use common::{popup_cmd, write_sales_fixture};
use predicates::prelude::*;

#[test]
fn test_help_lists_flags() {
    let dir = tempfile::tempdir().unwrap();
    popup_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--fixture"))
        .stdout(predicate::str::contains("--toggle"))
        .stdout(predicate::str::contains("--export"));
}

#[test]
fn test_close_prints_payload_and_persists_selection() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_sales_fixture(dir.path());
    let settings = dir.path().join("settings.json");

    popup_cmd(dir.path())
        .arg("--fixture")
        .arg(&fixture)
        .arg("--settings")
        .arg(&settings)
        .args(["--toggle", "Sales*"])
        .assert()
        .success()
        .stdout("15\n");

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&settings).unwrap()).unwrap();
    assert_eq!(saved["selectedDatasources"], r#"["Sales*"]"#);
}

#[test]
fn test_second_run_untoggles_persisted_selection() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_sales_fixture(dir.path());
    let settings = dir.path().join("settings.json");
    std::fs::write(&settings, r#"{"selectedDatasources": "[\"Sales*\"]"}"#).unwrap();

    popup_cmd(dir.path())
        .arg("--fixture")
        .arg(&fixture)
        .arg("--settings")
        .arg(&settings)
        .args(["--toggle", "Sales*"])
        .assert()
        .success();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&settings).unwrap()).unwrap();
    assert_eq!(saved["selectedDatasources"], "[]");
}

#[test]
fn test_export_writes_csv_into_out_dir() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_sales_fixture(dir.path());
    let out_dir = dir.path().join("exports");

    popup_cmd(dir.path())
        .arg("--fixture")
        .arg(&fixture)
        .arg("--settings")
        .arg(dir.path().join("settings.json"))
        .arg("--out-dir")
        .arg(&out_dir)
        .args(["--toggle", "Sales*", "--export", "--close-payload", "60"])
        .assert()
        .success()
        .stdout("60\n")
        .stderr(predicate::str::contains("Exported Sales.csv"));

    let csv = std::fs::read_to_string(out_dir.join("Sales.csv")).unwrap();
    assert_eq!(csv, "Region,Amount\nEast,1200\nWest,300");
}

#[test]
fn test_export_sanitizes_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_sales_fixture(dir.path());
    let out_dir = dir.path().join("exports");

    popup_cmd(dir.path())
        .arg("--fixture")
        .arg(&fixture)
        .arg("--settings")
        .arg(dir.path().join("settings.json"))
        .arg("--out-dir")
        .arg(&out_dir)
        .args(["--toggle", "Notes/2024*", "--export"])
        .assert()
        .success();

    assert!(out_dir.join("Notes_2024.csv").exists());
}

#[test]
fn test_export_without_selection_warns_and_still_closes() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_sales_fixture(dir.path());
    let out_dir = dir.path().join("exports");

    popup_cmd(dir.path())
        .arg("--fixture")
        .arg(&fixture)
        .arg("--settings")
        .arg(dir.path().join("settings.json"))
        .arg("--out-dir")
        .arg(&out_dir)
        .arg("--export")
        .assert()
        .success()
        .stdout("15\n")
        .stderr(predicate::str::contains(
            "Select a data source before exporting",
        ));

    assert!(!out_dir.exists());
}

#[test]
fn test_rejected_empty_export_fails() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = dir.path().join("host.json");
    std::fs::write(
        &fixture,
        r#"{"openPayload": "5", "worksheets": [{"name": "Empty*"}],
            "summaries": {"Empty*": {"columns": [{"fieldName": "A"}], "data": []}}}"#,
    )
    .unwrap();

    popup_cmd(dir.path())
        .arg("--fixture")
        .arg(&fixture)
        .arg("--settings")
        .arg(dir.path().join("settings.json"))
        .args(["--toggle", "Empty*", "--export", "--empty-result", "reject"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No data returned for 'Empty*'"));
}

#[test]
fn test_missing_fixture_fails_with_context() {
    let dir = tempfile::tempdir().unwrap();

    popup_cmd(dir.path())
        .arg("--fixture")
        .arg(dir.path().join("nope.json"))
        .arg("--settings")
        .arg(dir.path().join("settings.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read host fixture"));
}

#[test]
fn test_invalid_env_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_sales_fixture(dir.path());

    popup_cmd(dir.path())
        .env("POPUP_MAX_ROWS", "lots")
        .arg("--fixture")
        .arg(&fixture)
        .arg("--settings")
        .arg(dir.path().join("settings.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("POPUP_MAX_ROWS"));
}

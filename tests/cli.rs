use std::path::Path;

use assert_cmd::Command;
use facetq::test_utils::fixtures::sample_hierarchy_json;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

/// A `facetq` invocation isolated from the user's config and store.
fn facetq(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("facetq").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("FACETQ_ROOT", home.join("project"))
        .env_remove("RUST_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn import_fixture(home: &Path) {
    let file = home.join("hierarchy.json");
    std::fs::write(&file, sample_hierarchy_json()).unwrap();
    facetq(home)
        .args(["import", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 6 locations"));
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("facetq").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("facetq").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_query_empty_string_json() {
    let dir = tempdir().unwrap();
    let json = json_stdout(facetq(dir.path()).args(["--json", "query", ""]));
    assert_eq!(json["status"], "ok");
    assert_eq!(json["data"]["empty"], Value::Bool(true));
    assert_eq!(json["data"]["document"]["filters"], "");
    assert_eq!(json["data"]["document"]["length"], 50);
}

#[test]
fn test_query_compact_prints_document_only() {
    let dir = tempdir().unwrap();
    let output = facetq(dir.path())
        .args(["query", "industryId=7&name=nurse", "--compact"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let document: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["query"], "nurse");
    assert!(
        document["filters"]
            .as_str()
            .unwrap()
            .contains("searchable_industries_ids:\"7\"<score=41>")
    );
}

#[test]
fn test_query_human_output() {
    let dir = tempdir().unwrap();
    facetq(dir.path())
        .args(["query", "exactLocationId=amsterdam"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Query document"))
        .stdout(predicate::str::contains("searchable_locations_ids"));
}

#[test]
fn test_query_unknown_parameter_warns() {
    let dir = tempdir().unwrap();
    let json = json_stdout(facetq(dir.path()).args(["--json", "query", "industyId=7"]));
    let warning = json["warnings"][0].as_str().unwrap();
    assert!(warning.contains("industyId"));
    assert!(warning.contains("industryId"));
}

#[test]
fn test_validate_accepts_valid_query() {
    let dir = tempdir().unwrap();
    facetq(dir.path())
        .args(["validate", "industryId=4&priceTo=500&limit=20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("query string is valid"))
        .stdout(predicate::str::contains("limit: 20"));
}

#[test]
fn test_validate_rejects_invalid_value() {
    let dir = tempdir().unwrap();
    facetq(dir.path())
        .args(["validate", "industryId=abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("industryId"));
}

#[test]
fn test_validate_error_json_envelope() {
    let dir = tempdir().unwrap();
    let output = facetq(dir.path())
        .args(["--json", "validate", "jobTitleId=100&jobFunctionId=2"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["status"]["error"]["message"]
        .as_str()
        .unwrap()
        .contains("cannot be used together"));
}

#[test]
fn test_unknown_registry_fails() {
    let dir = tempdir().unwrap();
    facetq(dir.path())
        .args(["--registry", "everything", "query", ""])
        .assert()
        .failure();
}

#[test]
fn test_import_dry_run_writes_nothing() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("hierarchy.json");
    std::fs::write(&file, sample_hierarchy_json()).unwrap();

    let json = json_stdout(facetq(dir.path()).args([
        "--json",
        "import",
        file.to_str().unwrap(),
        "--dry-run",
    ]));
    assert_eq!(json["data"]["dry_run"], Value::Bool(true));
    assert_eq!(json["data"]["counts"]["locations"], 6);
    assert!(json["data"].get("import").is_none());
    assert!(!dir.path().join("project").exists());
}

#[test]
fn test_import_missing_file() {
    let dir = tempdir().unwrap();
    facetq(dir.path())
        .args(["import", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.json"));
}

#[test]
fn test_import_then_expand() {
    let dir = tempdir().unwrap();
    import_fixture(dir.path());

    let json = json_stdout(facetq(dir.path()).args(["--json", "expand", "--location", "nl"]));
    let inclusive: Vec<&str> = json["data"]["locations"]["inclusive"]
        .as_array()
        .unwrap()
        .iter()
        .map(|id| id.as_str().unwrap())
        .collect();
    assert_eq!(inclusive, ["amsterdam", "europe", "nl"]);

    let json = json_stdout(facetq(dir.path()).args(["--json", "expand", "--job-function", "2"]));
    assert_eq!(
        json["data"]["job_functions"]["inclusive"],
        serde_json::json!([1, 2, 3, 4])
    );
}

#[test]
fn test_import_then_query_uses_hierarchy() {
    let dir = tempdir().unwrap();
    import_fixture(dir.path());

    let json = json_stdout(facetq(dir.path()).args([
        "--json",
        "query",
        "jobFunctionId=3&includeLocationId=amsterdam",
    ]));
    let groups = json["data"]["active_groups"].as_array().unwrap();
    assert!(groups.contains(&Value::String("job_function_and_location".into())));
    assert!(
        json["data"]["document"]["filters"]
            .as_str()
            .unwrap()
            .contains("\"1_europe\"")
    );
}

#[test]
fn test_expand_requires_an_id() {
    let dir = tempdir().unwrap();
    facetq(dir.path()).arg("expand").assert().failure();
}

//! CLI integration tests for gcat commands.
//!
//! Every test runs against a catalog file seeded on disk; nothing touches the network
//! except the deliberately unreachable `add-instance` case.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// Catalog with two instances, two topics, and three tools.
///
/// `bwa_mem` has one version on both instances; `fastqc` is split across two versions,
/// one per instance; `samtools_view` is only on Europe.
const CATALOG: &str = r#"{
  "instances": [
    {"id": 1, "url": "https://eu.example", "brand": "Europe", "version": "24.0",
     "allow_user_creation": true, "enable_quotas": true, "require_login": false,
     "terms_url": null, "creation_date": 1700000000, "update_date": 1700000000},
    {"id": 2, "url": "https://au.example", "brand": "Galaxy Australia", "version": "23.1",
     "allow_user_creation": true, "enable_quotas": false, "require_login": false,
     "terms_url": null, "creation_date": 1700000000, "update_date": null}
  ],
  "tools": [
    {"id": 1, "name": "bwa_mem", "description": "Map medium and long reads",
     "display_name": "BWA-MEM", "topics": [1], "versions": [1]},
    {"id": 2, "name": "fastqc", "description": "Read quality reports",
     "display_name": "FastQC", "topics": [2], "versions": [2, 3]},
    {"id": 3, "name": "samtools_view", "description": "Filter alignments: by region",
     "display_name": "Samtools view", "topics": [], "versions": [4]}
  ],
  "versions": [
    {"id": 1, "name": "bwa_mem", "version": "0.7.17.2", "tool_shed": "toolshed.g2.bx.psu.edu",
     "owner": "devteam", "changeset": "e188dc7a68e6", "instances": [1, 2]},
    {"id": 2, "name": "fastqc", "version": "0.73", "tool_shed": "toolshed.g2.bx.psu.edu",
     "owner": "devteam", "changeset": "3d0c7bdf12f5", "instances": [1]},
    {"id": 3, "name": "fastqc", "version": "0.74", "tool_shed": "toolshed.g2.bx.psu.edu",
     "owner": "devteam", "changeset": "5ec9f6bceaee", "instances": [2]},
    {"id": 4, "name": "samtools_view", "version": "1.15.1", "tool_shed": null,
     "owner": null, "changeset": null, "instances": [1]}
  ],
  "topics": [
    {"id": 1, "label": "Mapping"},
    {"id": 2, "label": "Quality control"}
  ]
}"#;

/// Config pinning discovery and the catalog location to the temp dir.
const CONFIG: &str = "root = true\n\n[settings]\ncatalog = \"catalog.json\"\n\n[galaxy]\ntimeout_secs = 2\n";

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Creates a temp dir holding a config and the seeded catalog.
fn seeded() -> tempfile::TempDir {
    let dir = temp_dir();
    fs::write(dir.path().join(".gcat.toml"), CONFIG).unwrap();
    fs::write(dir.path().join("catalog.json"), CATALOG).unwrap();
    dir
}

/// Helper to get a gcat command running in `dir` with HOME isolated to it.
fn gcat(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("gcat").unwrap();
    cmd.current_dir(dir).env("HOME", dir).env_remove("RUST_LOG");
    cmd
}

/// Runs a command expected to succeed and parses its stdout as JSON.
fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

/// Names of the tools in a `search --json` result.
fn result_names(json: &Value) -> Vec<&str> {
    json["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect()
}

#[test]
fn help_lists_commands() {
    let dir = temp_dir();
    gcat(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("add-instance"))
        .stdout(predicate::str::contains("instances"));
}

#[test]
fn search_bare_word() {
    let dir = seeded();
    gcat(dir.path())
        .args(["search", "bwa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bwa_mem"))
        .stdout(predicate::str::contains("fastqc").not());
}

#[test]
fn search_words_are_joined() {
    let dir = seeded();
    let json = json_output(gcat(dir.path()).args(["search", "--json", "long", "reads"]));
    assert_eq!(json["query"], "long reads");
    assert_eq!(result_names(&json), vec!["bwa_mem"]);
}

#[test]
fn search_topic_is_case_sensitive_by_default() {
    let dir = seeded();
    let json = json_output(gcat(dir.path()).args(["search", "--json", "topic:Mapping"]));
    assert_eq!(result_names(&json), vec!["bwa_mem"]);
    assert_eq!(json["results"][0]["topics"][0], "Mapping");

    let json = json_output(gcat(dir.path()).args(["search", "--json", "topic:mapping"]));
    assert_eq!(json["total_matches"], 0);
}

#[test]
fn search_topic_case_insensitive_from_config() {
    let dir = seeded();
    fs::write(
        dir.path().join(".gcat.toml"),
        format!("{CONFIG}\n[search]\ncase_sensitive_topics = false\n"),
    )
    .unwrap();

    let json = json_output(gcat(dir.path()).args(["search", "--json", "topic:mapping"]));
    assert_eq!(result_names(&json), vec!["bwa_mem"]);
}

#[test]
fn search_quoted_topic_with_space() {
    let dir = seeded();
    let json = json_output(gcat(dir.path()).args([
        "search",
        "--json",
        "topic:\"Quality control\"",
    ]));
    assert_eq!(result_names(&json), vec!["fastqc"]);
}

#[test]
fn search_instances_need_one_version_on_all() {
    let dir = seeded();
    let json = json_output(gcat(dir.path()).args([
        "search",
        "--json",
        "instance:Europe instance:\"Galaxy Australia\"",
    ]));
    assert_eq!(result_names(&json), vec!["bwa_mem"]);

    let json = json_output(gcat(dir.path()).args(["search", "--json", "instance:europe"]));
    assert_eq!(
        result_names(&json),
        vec!["bwa_mem", "fastqc", "samtools_view"]
    );
}

#[test]
fn search_phrase_with_colon_is_free_text() {
    let dir = seeded();
    let json = json_output(gcat(dir.path()).args(["search", "--json", "\"alignments: by\""]));
    assert_eq!(result_names(&json), vec!["samtools_view"]);
}

#[test]
fn search_unknown_filters_match_nothing() {
    let dir = seeded();
    for query in ["topic:Nope", "instance:Nowhere", "color:red"] {
        gcat(dir.path())
            .args(["search", query])
            .assert()
            .success()
            .stdout(predicate::str::contains("No tools found."));
    }
}

#[test]
fn search_unclosed_quote_fails() {
    let dir = seeded();
    gcat(dir.path())
        .args(["search", "instance:\"Galaxy Australia"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unclosed quote"))
        .stderr(predicate::str::contains("^"));
}

#[test]
fn search_limit_truncates() {
    let dir = seeded();
    let json = json_output(gcat(dir.path()).args(["search", "--json", "-n", "1", "read"]));
    assert_eq!(json["total_matches"], 2);
    assert_eq!(result_names(&json), vec!["bwa_mem"]);

    gcat(dir.path())
        .args(["search", "-n", "1", "read"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing 1 of 2 tools"));
}

#[test]
fn search_explain_shows_plan() {
    let dir = seeded();
    gcat(dir.path())
        .args(["search", "--explain", "bwa topic:Mapping"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Parsed:"))
        .stdout(predicate::str::contains("text contains \"bwa\""))
        .stdout(predicate::str::contains("has topic \"Mapping\""));

    gcat(dir.path())
        .args(["search", "--explain", "topic:Nope"])
        .assert()
        .success()
        .stdout(predicate::str::contains("matches nothing"));
}

#[test]
fn search_without_catalog_finds_nothing() {
    let dir = temp_dir();
    fs::write(dir.path().join(".gcat.toml"), CONFIG).unwrap();
    gcat(dir.path())
        .args(["search", "bwa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tools found."));
}

#[test]
fn corrupt_catalog_is_an_error() {
    let dir = seeded();
    fs::write(dir.path().join("catalog.json"), "{not json").unwrap();
    gcat(dir.path())
        .args(["search", "bwa"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("catalog.json"));
}

#[test]
fn invalid_config_is_an_error() {
    let dir = seeded();
    fs::write(dir.path().join(".gcat.toml"), "root = true\n[galaxy]\ntimeout_secs = 0\n")
        .unwrap();
    gcat(dir.path())
        .args(["search", "bwa"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("galaxy.timeout_secs"));
}

#[test]
fn instances_table_and_json() {
    let dir = seeded();
    gcat(dir.path())
        .arg("instances")
        .assert()
        .success()
        .stdout(predicate::str::contains("Galaxy Australia"))
        .stdout(predicate::str::contains("never"));

    let json = json_output(gcat(dir.path()).args(["instances", "--json"]));
    let instances = json.as_array().unwrap();
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0]["brand"], "Europe");
    assert_eq!(instances[0]["tool_count"], 3);
    assert_eq!(instances[1]["tool_count"], 2);
}

#[test]
fn show_tool_details() {
    let dir = seeded();
    gcat(dir.path())
        .args(["show", "fastqc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Quality control"))
        .stdout(predicate::str::contains("0.74"))
        .stdout(predicate::str::contains("Galaxy Australia"));

    let json = json_output(gcat(dir.path()).args(["show", "--json", "bwa_mem"]));
    assert_eq!(json["display_name"], "BWA-MEM");
    assert_eq!(
        json["versions"][0]["hosted_on"],
        serde_json::json!(["Europe", "Galaxy Australia"])
    );
}

#[test]
fn show_unknown_tool_fails() {
    let dir = seeded();
    gcat(dir.path())
        .args(["show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no tool named"));
}

#[test]
fn init_creates_config_once() {
    let dir = temp_dir();
    let work = dir.path().join("work");
    fs::create_dir_all(&work).unwrap();
    fs::write(work.join(".gitignore"), "target/\n").unwrap();

    gcat(&work)
        .env("HOME", dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));
    assert!(work.join(".gcat.toml").is_file());
    assert!(fs::read_to_string(work.join(".gitignore")).unwrap().contains(".gcat/"));

    gcat(&work)
        .env("HOME", dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    gcat(&work)
        .env("HOME", dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn status_reports_catalog() {
    let dir = seeded();
    gcat(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains(".gcat.toml"))
        .stdout(predicate::str::contains("timeout_secs = 2"))
        .stdout(predicate::str::contains("tools:     3"))
        .stdout(predicate::str::contains("versions:  4"));
}

#[test]
fn status_without_catalog() {
    let dir = temp_dir();
    fs::write(dir.path().join(".gcat.toml"), CONFIG).unwrap();
    gcat(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("[missing]"));
}

#[test]
fn add_instance_rejects_bad_url() {
    let dir = seeded();
    gcat(dir.path())
        .args(["add-instance", "usegalaxy.eu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid server URL"));
}

#[test]
fn add_instance_unreachable_leaves_catalog_alone() {
    let dir = temp_dir();
    fs::write(dir.path().join(".gcat.toml"), CONFIG).unwrap();
    gcat(dir.path())
        .args(["add-instance", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("127.0.0.1:9"));
    assert!(!dir.path().join("catalog.json").exists());
}

#[test]
fn update_with_no_instances() {
    let dir = temp_dir();
    fs::write(dir.path().join(".gcat.toml"), CONFIG).unwrap();
    gcat(dir.path())
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("No instances registered."));
}

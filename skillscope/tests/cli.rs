//! End-to-end CLI tests against a temporary assistant home.

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Command with HOME and XDG dirs pointed at an isolated temp tree.
fn skillscope(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("skillscope").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_STATE_HOME", home.join(".local/state"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn catalog_lists_discovered_skills() {
    let tmp = TempDir::new().unwrap();
    let home = tmp.path();
    write(
        &home.join(".claude/skills/deploy-helper/SKILL.md"),
        "---\nname: deploy-helper\ndescription: Use for deployments\n---\n",
    );
    let empty_project = home.join("project");
    fs::create_dir_all(&empty_project).unwrap();

    skillscope(home)
        .args(["catalog", "--project-root"])
        .arg(&empty_project)
        .assert()
        .success()
        .stdout(predicates::str::contains("skill:deploy-helper"));
}

#[test]
fn catalog_classifies_usage_against_project_sessions() {
    let tmp = TempDir::new().unwrap();
    let home = tmp.path();
    write(
        &home.join(".claude/skills/security-audit/SKILL.md"),
        "---\nname: security-audit\ndescription: Use for security audit, vulnerability scanning.\n---\n",
    );
    write(
        &home.join(".claude/skills/kube-deploy/SKILL.md"),
        "---\nname: kube-deploy\ndescription: Use for kubernetes deployment.\n---\n",
    );
    write(
        &home.join(".claude/projects/-work-api/s1.jsonl"),
        r#"{"type":"user","timestamp":"2026-08-28T09:00:00Z","message":{"role":"user","content":"Run a security audit and vulnerability scanning pass over this repo"}}"#,
    );
    let empty_project = home.join("project");
    fs::create_dir_all(&empty_project).unwrap();

    let output = skillscope(home)
        .args(["--format", "json", "catalog", "--project", "api", "--project-root"])
        .arg(&empty_project)
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let entries = value["entries"].as_array().unwrap();
    let usage_of = |name: &str| {
        entries
            .iter()
            .find(|e| e["name"] == name)
            .map(|e| e["usage"].clone())
            .unwrap()
    };
    assert_eq!(usage_of("security-audit"), "dormant");
    assert_eq!(usage_of("kube-deploy"), "unused");
}

#[test]
fn doctor_reports_cache_and_description_issues() {
    let tmp = TempDir::new().unwrap();
    let home = tmp.path();
    fs::create_dir_all(home.join(".claude/plugins/cache/temp_git_abc123")).unwrap();
    write(
        &home.join(".claude/skills/mystery/SKILL.md"),
        "---\nname: mystery\ndescription: ''\n---\n",
    );
    let empty_project = home.join("project");
    fs::create_dir_all(&empty_project).unwrap();

    skillscope(home)
        .args(["doctor", "--project-root"])
        .arg(&empty_project)
        .assert()
        .success()
        .stdout(predicates::str::contains("temp_git_abc123"))
        .stdout(predicates::str::contains("skill:mystery: empty description"));
}

#[test]
fn overlaps_reports_shared_triggers_as_json() {
    let tmp = TempDir::new().unwrap();
    let home = tmp.path();
    write(
        &home.join(".claude/skills/scanner-a/SKILL.md"),
        "---\nname: scanner-a\ndescription: Triggers on 'secret scanning'\n---\n",
    );
    write(
        &home.join(".claude/skills/scanner-b/SKILL.md"),
        "---\nname: scanner-b\ndescription: Triggers on 'secret scanning'\n---\n",
    );
    let empty_project = home.join("project");
    fs::create_dir_all(&empty_project).unwrap();

    let output = skillscope(home)
        .args(["overlaps", "--format", "json", "--project-root"])
        .arg(&empty_project)
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(value["finding_count"].as_u64().unwrap() >= 1);
    let findings = value["findings"].as_array().unwrap();
    assert!(findings
        .iter()
        .any(|f| f["trigger"] == "secret scanning" && f["classification"] == "COLLISION"));
}

#[test]
fn missed_detects_uninvoked_matching_skill() {
    let tmp = TempDir::new().unwrap();
    let home = tmp.path();
    write(
        &home.join(".claude/skills/security-audit/SKILL.md"),
        "---\nname: security-audit\ndescription: Use for security audit.\n---\n",
    );
    write(
        &home.join(".claude/projects/-work-api/s1.jsonl"),
        r#"{"type":"user","timestamp":"2026-08-28T09:00:00Z","message":{"role":"user","content":"security audit please, check everything"}}"#,
    );
    let empty_project = home.join("project");
    fs::create_dir_all(&empty_project).unwrap();

    skillscope(home)
        .args([
            "missed",
            "api",
            "--min-confidence",
            "0",
            "--min-triggers",
            "1",
            "--project-root",
        ])
        .arg(&empty_project)
        .assert()
        .success()
        .stdout(predicates::str::contains("skill:security-audit"));
}

#[test]
fn missed_fails_for_unknown_project() {
    let tmp = TempDir::new().unwrap();
    let home = tmp.path();
    fs::create_dir_all(home.join(".claude/projects")).unwrap();
    let empty_project = home.join("project");
    fs::create_dir_all(&empty_project).unwrap();

    skillscope(home)
        .args(["missed", "no-such-project", "--project-root"])
        .arg(&empty_project)
        .assert()
        .failure()
        .stderr(predicates::str::contains("no-such-project"));
}

#[test]
fn rejects_out_of_range_confidence() {
    let tmp = TempDir::new().unwrap();
    let home = tmp.path();
    fs::create_dir_all(home.join(".claude/projects/-work-api")).unwrap();
    let empty_project = home.join("project");
    fs::create_dir_all(&empty_project).unwrap();

    skillscope(home)
        .args([
            "missed",
            "api",
            "--min-confidence",
            "1.5",
            "--project-root",
        ])
        .arg(&empty_project)
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid analysis options"));
}

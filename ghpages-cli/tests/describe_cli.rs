use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const REPO_URL: &str = "https://example.com/me/proj.git";

fn ghpages_cmd(project: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ghpages"));
    cmd.current_dir(project).env_remove("RUST_LOG");
    cmd
}

fn describe(project: &TempDir) -> Command {
    let mut cmd = ghpages_cmd(project.path());
    cmd.arg("describe")
        .arg("--project-root")
        .arg(project.path())
        .args(["--repo-url", REPO_URL]);
    cmd
}

#[test]
fn describe_prints_name_and_description() {
    let project = TempDir::new().expect("project");
    describe(&project)
        .assert()
        .success()
        .stdout(format!("github-pages:publish  # Publish doc to {REPO_URL}#gh-pages\n"));
}

#[test]
fn describe_json_lists_resolved_settings() {
    let project = TempDir::new().expect("project");
    let output = describe(&project)
        .args(["--json", "--branch", "pages", "--remote", "upstream"])
        .output()
        .expect("run ghpages describe --json");
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["name"], "github-pages:publish");
    assert_eq!(json["repo_url"], REPO_URL);
    assert_eq!(json["branch_name"], "pages");
    assert_eq!(json["remote_name"], "upstream");
    assert_eq!(json["doc_dir"], "doc");
    assert_eq!(
        json["description"],
        format!("Publish doc to {REPO_URL}#pages")
    );
}

#[test]
fn config_file_in_project_root_is_applied() {
    let project = TempDir::new().expect("project");
    std::fs::write(
        project.path().join("github-pages.yaml"),
        "doc_dir: site\nbranch_name: pages\nnamespace: docs\n",
    )
    .expect("write config");

    describe(&project)
        .assert()
        .success()
        .stdout(format!("docs:publish  # Publish site to {REPO_URL}#pages\n"));
}

#[test]
fn flags_override_config_file() {
    let project = TempDir::new().expect("project");
    std::fs::write(
        project.path().join("github-pages.yaml"),
        "branch_name: pages\n",
    )
    .expect("write config");

    describe(&project)
        .args(["--branch", "docs-site"])
        .assert()
        .success()
        .stdout(contains("#docs-site"));
}

#[test]
fn explicit_config_must_exist() {
    let project = TempDir::new().expect("project");
    describe(&project)
        .arg("--config")
        .arg(project.path().join("missing.yaml"))
        .assert()
        .failure()
        .stderr(contains("failed to load config"));
}

#[test]
fn unknown_config_key_is_an_error() {
    let project = TempDir::new().expect("project");
    std::fs::write(project.path().join("github-pages.yaml"), "branch: main\n")
        .expect("write config");

    describe(&project)
        .assert()
        .failure()
        .stderr(contains("unknown field"));
}

#[test]
fn quiet_and_verbose_are_mutually_exclusive() {
    let project = TempDir::new().expect("project");
    describe(&project)
        .args(["--quiet", "--verbose"])
        .assert()
        .failure()
        .stderr(contains("cannot be used with"));
}

#[test]
fn verbose_logs_settings_resolution() {
    let project = TempDir::new().expect("project");
    ghpages_cmd(project.path())
        .env("GIT_CEILING_DIRECTORIES", project.path())
        .args(["describe", "--verbose", "--repo-url", REPO_URL])
        .assert()
        .success()
        .stderr(contains("skipping config lookup"));
}

// ABOUTME: Integration tests for the ecs CLI.
// ABOUTME: Covers help output, aliases, and input errors raised before any AWS call.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A project directory and an empty home, so no user config leaks in.
struct Workspace {
    home: TempDir,
    project: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            home: tempfile::tempdir().unwrap(),
            project: tempfile::tempdir().unwrap(),
        }
    }

    fn with_config(yaml: &str) -> Self {
        let workspace = Self::new();
        fs::write(workspace.project.path().join(".ecstools.yml"), yaml).unwrap();
        workspace
    }

    fn ecs(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ecs"));
        cmd.current_dir(self.project.path())
            .env("HOME", self.home.path())
            .env_remove("AWS_PROFILE")
            .env_remove("AWS_REGION")
            .env_remove("AWS_DEFAULT_REGION");
        cmd
    }
}

#[test]
fn help_shows_commands() {
    Workspace::new()
        .ecs()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cluster"))
        .stdout(predicate::str::contains("service"))
        .stdout(predicate::str::contains("task-definition"));
}

#[test]
fn service_help_lists_subcommands() {
    Workspace::new()
        .ecs()
        .args(["service", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("scale"))
        .stdout(predicate::str::contains("top"))
        .stdout(predicate::str::contains("env"))
        .stdout(predicate::str::contains("exec"));
}

#[test]
fn version_flag() {
    Workspace::new()
        .ecs()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ecs "));
}

#[test]
fn deploy_without_tags_fails_before_aws() {
    Workspace::new()
        .ecs()
        .args(["service", "deploy", "production", "app1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: specify one or more tags"));
}

#[test]
fn deploy_with_invalid_tag_fails() {
    Workspace::new()
        .ecs()
        .args(["service", "deploy", "production", "app1", "v1/x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid character in image tag"));
}

#[test]
fn group_deploy_without_group_section() {
    Workspace::with_config("region: us-east-1\n")
        .ecs()
        .args(["service", "deploy", "-g", "production", "web", "v2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Config section not found: service-group",
        ));
}

#[test]
fn group_deploy_with_unknown_group() {
    Workspace::with_config("service-group:\n  web: app1 app2\n")
        .ecs()
        .args(["service", "deploy", "-g", "production", "api", "v2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Service group not found: api"));
}

#[test]
fn top_with_unknown_group() {
    Workspace::with_config("service-group:\n  web: app1\n")
        .ecs()
        .args(["service", "top", "-g", "production", "jobs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Service group not found: jobs"));
}

#[test]
fn aliases_expand_from_config() {
    Workspace::with_config("alias:\n  dp: service deploy\n")
        .ecs()
        .args(["dp", "production", "app1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("specify one or more tags"));
}

#[test]
fn prefixes_select_commands() {
    Workspace::new()
        .ecs()
        .args(["ser", "dep", "production", "app1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("specify one or more tags"));
}

#[test]
fn malformed_env_pair_fails_before_aws() {
    Workspace::new()
        .ecs()
        .args(["service", "env", "production", "app1", "NOEQUALS"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a valid pair: NOEQUALS"));
}

#[test]
fn json_errors_are_structured() {
    Workspace::new()
        .ecs()
        .args(["--json", "service", "deploy", "production", "app1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"event\":\"error\""));
}

#[test]
fn broken_config_is_reported() {
    Workspace::with_config("service-group: [")
        .ecs()
        .args(["cluster", "ls"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YAML parse error"));
}

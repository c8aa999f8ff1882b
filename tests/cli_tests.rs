//! CLI smoke tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("updatecli-publish").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("prepare"))
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("release"))
        .stdout(predicate::str::contains("branch-exists"));
}

#[test]
fn test_auth_setup_prints_instructions() {
    cli()
        .args(["auth", "github", "setup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GITHUB_TOKEN"))
        .stdout(predicate::str::contains("GITHUB_USERNAME"));

    cli()
        .args(["auth", "gitlab", "setup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GITLAB_TOKEN"));
}

#[test]
fn test_copy_requires_src_and_dest() {
    cli()
        .args([
            "--repo",
            "https://github.com/updatecli/website",
            "publish",
            "--version",
            "1.0.0",
            "--copy",
            "VERSION",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SRC=DEST"));
}

#[test]
fn test_unsupported_host_is_rejected() {
    let root = TempDir::new().unwrap();
    cli()
        .args([
            "--repo",
            "https://example.org/updatecli/website",
            "--workspace-root",
            root.path().to_str().unwrap(),
            "clean",
            "--version",
            "1.0.0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported remote host"));
}

#[test]
fn test_clean_removes_workspace() {
    let root = TempDir::new().unwrap();
    let workspace = root.path().join("updatecli/website/1.0.0");
    std::fs::create_dir_all(&workspace).unwrap();
    std::fs::write(workspace.join("VERSION"), "1.0.0\n").unwrap();

    cli()
        .args([
            "--repo",
            "https://github.com/updatecli/website",
            "--workspace-root",
            root.path().to_str().unwrap(),
            "clean",
            "--version",
            "1.0.0",
        ])
        .assert()
        .success();
    assert!(!workspace.exists());

    cli()
        .args([
            "--repo",
            "https://github.com/updatecli/website",
            "--workspace-root",
            root.path().to_str().unwrap(),
            "clean",
            "--version",
            "1.0.0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to clean"));
}

#[test]
fn test_branch_exists_is_gitlab_only() {
    cli()
        .args([
            "--repo",
            "https://github.com/updatecli/website",
            "branch-exists",
            "--branch",
            "main",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only supported for GitLab"));
}

#[test]
fn test_branch_exists_only_needs_a_token() {
    let mut server = mockito::Server::new();
    let route = r"^/api/v4/projects/updatecli(%2F|/)website/repository/branches/main$";
    let branch = server
        .mock("GET", mockito::Matcher::Regex(route.into()))
        .with_header("content-type", "application/json")
        .with_body(r#"{"name":"main"}"#)
        .create();
    let user = server.mock("GET", "/api/v4/user").expect(0).create();

    cli()
        .env("PATH", "")
        .env("GITLAB_TOKEN", "glpat-test")
        .env_remove("GITLAB_USERNAME")
        .args([
            "--repo",
            "https://gitlab.com/updatecli/website",
            "--api-url",
            server.url().as_str(),
            "branch-exists",
            "--branch",
            "main",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("exists"));

    branch.assert();
    user.assert();
}

//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const COHORT1: &str = "project_title,github_username,student_repository_name,student_repository_url,project_url,author,authors,id\n\
Alpha,alice,repo-a,https://github.com/alice/repo-a,,,,1\n\
Alpha,bob,repo-a,https://github.com/bob/repo-a,,,,2\n";

const COHORT2: &str = "project_title|github_username|student_repository_name|id\n\
Beta|carol|repo-b|3\n";

fn showcase(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("showcase"));
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn site() -> TempDir {
    let tmp = TempDir::new().expect("tmp");
    let projects = tmp.path().join("src/data/projects");
    fs::create_dir_all(&projects).expect("mkdir");
    fs::write(projects.join("cohort1.csv"), COHORT1).expect("write");
    fs::write(projects.join("cohort2.csv"), COHORT2).expect("write");

    let briefings = tmp.path().join("src/data/briefings");
    fs::create_dir_all(&briefings).expect("mkdir");
    fs::write(
        briefings.join("cohort1.md"),
        "---\ntitle: Cohort 1\ndescription: Generative type\n---\nBody text.\n",
    )
    .expect("write");
    tmp
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).expect("read")).expect("json")
}

#[test]
fn test_cli_version() {
    let tmp = TempDir::new().expect("tmp");
    showcase(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("showcase"));
}

#[test]
fn test_cli_help() {
    let tmp = TempDir::new().expect("tmp");
    showcase(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("backfill-ids"))
        .stdout(predicate::str::contains("screenshots"))
        .stdout(predicate::str::contains("colors"))
        .stdout(predicate::str::contains("avatars"));
}

#[test]
fn test_build_writes_collections() {
    let tmp = site();
    showcase(tmp.path())
        .args(["build", "--offline", "--no-timestamp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 project(s)"))
        .stdout(predicate::str::contains("3 author(s)"));

    let out = tmp.path().join("dist/collections");
    let projects = read_json(&out.join("projects.json"));
    assert_eq!(projects[0]["id"], "cohort1");
    assert_eq!(projects[0]["rows"][0]["project_url"], "https://hbk-bs.github.io/repo-a");
    assert_eq!(projects[0]["rows"][0]["authors"], serde_json::json!(["alice", "bob"]));
    assert_eq!(projects[1]["rows"][0]["author"], "carol");

    let briefings = read_json(&out.join("briefings.json"));
    assert_eq!(briefings[0]["title"], "Cohort 1");
    assert!(read_json(&out.join("build.json")).get("generated_at").is_none());
}

#[test]
fn test_build_excludes_users_from_projects_and_authors() {
    let tmp = site();
    showcase(tmp.path())
        .args(["build", "--offline", "--exclude-users", "bob", "-o", "public"])
        .assert()
        .success();

    let out = tmp.path().join("public");
    let authors = read_json(&out.join("authors.json"));
    let names: Vec<_> = authors.as_array().expect("array").iter().map(|a| a["id"].clone()).collect();
    assert_eq!(names, vec!["alice", "carol"]);

    let projects = read_json(&out.join("projects.json"));
    assert_eq!(projects[0]["rows"][0]["authors"], serde_json::json!(["alice"]));
}

#[test]
fn test_build_reads_config_file() {
    let tmp = site();
    fs::write(
        tmp.path().join("showcase.toml"),
        "project_order = ['cohort2']\noutput_dir = 'site-data'\n",
    )
    .expect("write");

    showcase(tmp.path()).args(["build", "--offline"]).assert().success();
    let projects = read_json(&tmp.path().join("site-data/projects.json"));
    assert_eq!(projects.as_array().expect("array").len(), 1);
    assert_eq!(projects[0]["id"], "cohort2");
}

#[test]
fn test_build_rejects_broken_explicit_config() {
    let tmp = site();
    fs::write(tmp.path().join("custom.toml"), "exclude_users = 42\n").expect("write");
    showcase(tmp.path())
        .args(["build", "--offline", "--config", "custom.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid TOML config"));
}

#[test]
fn test_backfill_ids_is_idempotent() {
    let tmp = TempDir::new().expect("tmp");
    let csv = tmp.path().join("cohort.csv");
    fs::write(&csv, "project_title,github_username,id\nAlpha,alice,\nBeta,bob,keep-me\n")
        .expect("write");

    showcase(tmp.path())
        .args(["backfill-ids", "cohort.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated:"))
        .stdout(predicate::str::contains("(1 ids assigned)"));

    let after = fs::read_to_string(&csv).expect("read");
    assert!(after.contains("keep-me"));
    assert!(!after.contains("alice,\n"));

    showcase(tmp.path())
        .args(["backfill-ids", "cohort.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes made."));
    assert_eq!(fs::read_to_string(&csv).expect("read"), after);
}

#[test]
fn test_backfill_ids_missing_file_fails() {
    let tmp = TempDir::new().expect("tmp");
    showcase(tmp.path())
        .args(["backfill-ids", "missing.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_backfill_ids_without_id_column_fails() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("c.csv"), "project_title,github_username\nAlpha,alice\n")
        .expect("write");
    showcase(tmp.path())
        .args(["backfill-ids", "c.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("id"));
}

#[test]
fn test_colors_writes_report() {
    let tmp = TempDir::new().expect("tmp");
    let shots = tmp.path().join("shots/cohort1");
    fs::create_dir_all(&shots).expect("mkdir");
    image::RgbImage::from_pixel(8, 8, image::Rgb([0, 0, 255]))
        .save(shots.join("1.png"))
        .expect("png");

    showcase(tmp.path())
        .args(["colors", "-i", "shots", "-o", "colors.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 of 1"));

    let report = read_json(&tmp.path().join("colors.json"));
    assert_eq!(report["colors"][0]["id"], "1");
    assert_eq!(report["colors"][0]["dominantColor"]["hex"], "#0000ff");
}

#[test]
fn test_colors_fails_after_writing_report_when_an_image_is_broken() {
    let tmp = TempDir::new().expect("tmp");
    let shots = tmp.path().join("shots");
    fs::create_dir_all(&shots).expect("mkdir");
    fs::write(shots.join("bad.png"), b"nope").expect("write");

    showcase(tmp.path()).args(["colors", "-i", "shots", "-o", "colors.json"]).assert().failure();
    assert_eq!(read_json(&tmp.path().join("colors.json"))["failed"], 1);
}

#[test]
fn test_screenshots_without_browser_reports_failures() {
    let tmp = site();
    showcase(tmp.path())
        .args(["screenshots", "--browser", "showcase-no-such-browser", "-o", "shots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("screenshot(s) failed"));

    let reports: Vec<_> = fs::read_dir(tmp.path().join("shots"))
        .expect("dir")
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert!(reports.iter().any(|name| name.starts_with("summary-")));
    assert!(reports.iter().any(|name| name.starts_with("errors-")));
}

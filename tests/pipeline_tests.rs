//! End-to-end roster → collections tests through the library API

use showcase::collections::{apply_filters, assemble, build_authors};
use showcase::domain::{AuthorRef, Config};
use showcase::filter::{filter_authors_excluding_usernames, filter_projects};
use showcase::ingest::{backfill_file, load_sources, BackfillOutcome, PROJECT_SCHEMA};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_cohorts(dir: &Path) {
    fs::write(
        dir.join("cohort1.csv"),
        "id,github_username,student_repository_name,project_title\n\
         1,alice,repo-a,Alpha\n\
         2,bob,repo-a,Alpha\n",
    )
    .expect("write");
    fs::write(
        dir.join("cohort2.csv"),
        "id,github_username,student_repository_name,project_title\n3,carol,repo-b,Beta\n",
    )
    .expect("write");
}

fn config_for(root: &Path) -> Config {
    Config {
        projects_dir: root.to_path_buf(),
        briefings_dir: root.join("briefings"),
        screenshots_dir: root.join("screenshots"),
        placeholder_image: root.join("screenshots/placeholder.png"),
        colors_report: root.join("colors.json"),
        avatars_dir: root.join("avatars"),
        ..Config::default()
    }
}

fn author_ids(row: &showcase::domain::Row) -> Vec<&str> {
    row.authors.iter().map(AuthorRef::id).collect()
}

#[test]
fn two_cohorts_exclude_bob() {
    let tmp = TempDir::new().expect("tmp");
    write_cohorts(tmp.path());
    let config = config_for(tmp.path());
    let sources = load_sources(tmp.path(), &PROJECT_SCHEMA).expect("load");

    let authors = build_authors(&sources, &config.profile_base_url);
    let names: Vec<_> = authors.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);

    let filtered = filter_authors_excluding_usernames(&authors, &["bob"]);
    let names: Vec<_> = filtered.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(names, vec!["alice", "carol"]);

    let collections = assemble(&sources, &config);
    let projects =
        filter_projects(&collections.projects, &["bob"], &[] as &[&str], &["cohort1", "cohort2"]);
    assert_eq!(projects.len(), 2);
    let cohort1 = &projects[0];
    assert_eq!(cohort1.id, "cohort1");
    assert_eq!(cohort1.rows.len(), 1);
    assert_eq!(cohort1.rows[0].project_url.as_deref(), Some("https://hbk-bs.github.io/repo-a"));
    assert_eq!(author_ids(&cohort1.rows[0]), vec!["alice"]);
}

#[test]
fn without_exclusions_dedupe_merges_shared_repository() {
    let tmp = TempDir::new().expect("tmp");
    write_cohorts(tmp.path());
    let config = config_for(tmp.path());
    let sources = load_sources(tmp.path(), &PROJECT_SCHEMA).expect("load");

    let collections = apply_filters(assemble(&sources, &config), &config);
    similar_asserts::assert_eq!(
        collections.projects.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
        vec!["cohort1", "cohort2"]
    );
    assert_eq!(author_ids(&collections.projects[0].rows[0]), vec!["alice", "bob"]);
    assert_eq!(collections.authors.len(), 3);
}

#[test]
fn backfilled_roster_feeds_the_build() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("cohort1.csv");
    fs::write(&path, "id,github_username,student_repository_name\n\"\",alice,repo-a\n")
        .expect("write");

    assert_eq!(backfill_file(&path).expect("backfill"), BackfillOutcome::Updated { assigned: 1 });
    assert_eq!(backfill_file(&path).expect("backfill"), BackfillOutcome::Unchanged);

    let config = config_for(tmp.path());
    let sources = load_sources(tmp.path(), &PROJECT_SCHEMA).expect("load");
    let collections = assemble(&sources, &config);
    let id = &collections.projects[0].rows[0].id;
    assert!(uuid::Uuid::parse_str(id).is_ok(), "not a uuid: {id}");
}

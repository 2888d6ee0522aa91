//! Content collections handed to the rendering layer.

pub mod aggregate;
pub mod briefings;
pub mod validate;

pub use aggregate::{build_authors, build_projects, collect_usernames, derive_project_url};
pub use briefings::load_briefings;

use crate::domain::{Author, Briefing, Config, Project};
use crate::enrich::{attach_avatars, enrich_projects, AvatarCache, PaletteIndex, ScreenshotLocator};
use crate::filter::{filter_authors_excluding_usernames, filter_projects};
use crate::ingest::{load_sources, SourceFile, PROJECT_SCHEMA};
use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};
use validate::{dangling_briefings, validate_authors, validate_projects};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collections {
    pub projects: Vec<Project>,
    pub authors: Vec<Author>,
    pub briefings: Vec<Briefing>,
}

/// Load, filter and finish the collections for a build.
///
/// Avatars are resolved only for authors that survive the exclusions.
pub fn build_collections(config: &Config, avatars: &AvatarCache) -> Result<Collections> {
    let collections = apply_filters(load_collections(config)?, config);
    let authors = attach_avatars(collections.authors, avatars);
    Ok(Collections { authors, ..collections })
}

/// Load every roster under `config.projects_dir` and assemble collections.
pub fn load_collections(config: &Config) -> Result<Collections> {
    let sources = load_sources(&config.projects_dir, &PROJECT_SCHEMA)?;
    Ok(assemble(&sources, config))
}

/// Aggregate, validate and enrich parsed sources, and load briefings.
/// Authors come back without avatars.
pub fn assemble(sources: &[SourceFile], config: &Config) -> Collections {
    let projects = validate_projects(build_projects(sources, &config.pages_base_url));

    let locator =
        ScreenshotLocator::new(&config.screenshots_dir, Some(config.placeholder_image.clone()));
    let palette = PaletteIndex::load_or_empty(&config.colors_report);
    let projects = enrich_projects(projects, &locator, &palette);

    let authors = build_authors(sources, &config.profile_base_url);
    let authors = validate_authors(authors);

    let briefings = load_briefings(&config.briefings_dir);
    for id in dangling_briefings(&projects, &briefings) {
        warn!("projects reference briefing '{}' which does not exist", id);
    }

    info!(
        "assembled {} project(s), {} author(s), {} briefing(s)",
        projects.len(),
        authors.len(),
        briefings.len()
    );
    Collections { projects, authors, briefings }
}

/// Apply the configured user/title exclusions and project ordering.
///
/// Without a configured `project_order` every project is kept, sorted by id.
pub fn apply_filters(collections: Collections, config: &Config) -> Collections {
    let order: Vec<String> = match &config.project_order {
        Some(order) => order.clone(),
        None => {
            let mut ids: Vec<String> = collections.projects.iter().map(|p| p.id.clone()).collect();
            ids.sort();
            ids
        }
    };

    let projects = filter_projects(
        &collections.projects,
        &config.exclude_users,
        &config.exclude_titles,
        &order,
    );
    let authors = filter_authors_excluding_usernames(&collections.authors, &config.exclude_users);
    Collections { projects, authors, briefings: collections.briefings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    fn config_for(root: &std::path::Path) -> Config {
        Config {
            projects_dir: root.join("projects"),
            briefings_dir: root.join("briefings"),
            screenshots_dir: root.join("screenshots"),
            placeholder_image: root.join("screenshots").join("placeholder.png"),
            colors_report: root.join("projects").join("colors.json"),
            avatars_dir: root.join("avatars"),
            output_dir: root.join("out"),
            ..Config::default()
        }
    }

    #[test]
    fn unordered_config_keeps_all_projects_sorted() {
        let tmp = TempDir::new().expect("tmp");
        let config = config_for(tmp.path());
        fs::create_dir_all(&config.projects_dir).expect("mkdir");
        fs::write(
            config.projects_dir.join("b.csv"),
            "id,github_username,student_repository_name\n1,alice,repo-a\n",
        )
        .expect("write");
        fs::write(
            config.projects_dir.join("a.csv"),
            "id,github_username,student_repository_name\n2,bob,repo-b\n",
        )
        .expect("write");

        let avatars = AvatarCache::offline(&config.avatars_dir);
        let collections = build_collections(&config, &avatars).expect("build");
        let ids: Vec<_> = collections.projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(collections.briefings.is_empty());
    }

    #[test]
    fn configured_order_is_an_allow_list() {
        let tmp = TempDir::new().expect("tmp");
        let mut config = config_for(tmp.path());
        config.project_order = Some(vec!["b".to_string()]);
        fs::create_dir_all(&config.projects_dir).expect("mkdir");
        for name in ["a", "b"] {
            fs::write(
                config.projects_dir.join(format!("{name}.csv")),
                format!("id,github_username,student_repository_name\n1,{name}-user,repo-{name}\n"),
            )
            .expect("write");
        }

        let collections = apply_filters(load_collections(&config).expect("load"), &config);
        assert_eq!(collections.projects.len(), 1);
        assert_eq!(collections.projects[0].id, "b");
        // Authors are not narrowed by project ordering.
        assert_eq!(collections.authors.len(), 2);
    }

    /// Answer every request with a tiny PNG body and record the request paths.
    fn avatar_server() -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        let requested = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requested);
        thread::spawn(move || {
            for mut stream in listener.incoming().flatten() {
                let mut buf = [0u8; 4096];
                let n = stream.read(&mut buf).unwrap_or(0);
                let head = String::from_utf8_lossy(&buf[..n]).into_owned();
                if let Some(path) = head.split_whitespace().nth(1) {
                    log.lock().expect("lock").push(path.to_string());
                }
                let _ = stream.write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\nConnection: close\r\n\r\npng",
                );
            }
        });
        (format!("http://{addr}"), requested)
    }

    #[test]
    fn excluded_authors_are_never_fetched() {
        let tmp = TempDir::new().expect("tmp");
        let mut config = config_for(tmp.path());
        config.exclude_users = vec!["bob".to_string()];
        fs::create_dir_all(&config.projects_dir).expect("mkdir");
        fs::write(
            config.projects_dir.join("cohort1.csv"),
            "id,github_username,student_repository_name\n1,alice,repo-a\n2,bob,repo-b\n",
        )
        .expect("write");

        let (base, requested) = avatar_server();
        let avatars = AvatarCache::new(&config.avatars_dir, &base, Duration::from_secs(5))
            .expect("cache");
        let collections = build_collections(&config, &avatars).expect("build");

        let names: Vec<_> = collections.authors.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(names, vec!["alice"]);
        assert!(collections.authors[0].avatar.is_some());
        assert_eq!(*requested.lock().expect("lock"), vec!["/alice.png".to_string()]);
        assert!(!config.avatars_dir.join("bob.png").exists());
    }
}

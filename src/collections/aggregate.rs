//! Project and author aggregation across roster files.

use crate::domain::{Author, AuthorRef, BriefingRef, Project, Row};
use crate::ingest::{Record, SourceFile};
use crate::utils::non_blank;
use std::collections::BTreeSet;

/// Published site URL for a student repository, if a name is given.
pub fn derive_project_url(pages_base_url: &str, repository_name: Option<&str>) -> Option<String> {
    let name = repository_name.map(str::trim).filter(|n| !n.is_empty())?;
    Some(format!("{}/{}", pages_base_url.trim_end_matches('/'), name))
}

/// One [`Project`] per source file, with `project_url` and `briefing`
/// derived on every row.
pub fn build_projects(sources: &[SourceFile], pages_base_url: &str) -> Vec<Project> {
    sources
        .iter()
        .map(|source| {
            let project_id = source.stem().to_string();
            let rows = source
                .records
                .iter()
                .map(|record| row_from_record(record, &project_id, pages_base_url))
                .collect();
            Project { id: project_id, filename: source.filename.clone(), rows }
        })
        .collect()
}

pub fn row_from_record(record: &Record, project_id: &str, pages_base_url: &str) -> Row {
    let field = |name: &str| record.get(name).map(String::as_str).unwrap_or("");
    let username = field("github_username").trim().to_string();
    let repository_name = non_blank(field("student_repository_name"));

    Row {
        id: field("id").trim().to_string(),
        project_title: non_blank(field("project_title")),
        project_url: derive_project_url(pages_base_url, repository_name.as_deref()),
        student_repository_url: non_blank(field("student_repository_url")),
        student_repository_name: repository_name,
        author: AuthorRef::new(username.clone()),
        github_username: username,
        authors_raw: field("authors").to_string(),
        authors: Vec::new(),
        briefing: BriefingRef::new(project_id),
        screenshot: None,
        colors: None,
    }
}

/// Distinct, trimmed, non-empty usernames across every row of every file.
pub fn collect_usernames(sources: &[SourceFile]) -> BTreeSet<String> {
    sources
        .iter()
        .flat_map(|source| source.records.iter())
        .filter_map(|record| record.get("github_username").and_then(|u| non_blank(u)))
        .collect()
}

pub fn build_authors(sources: &[SourceFile], profile_base_url: &str) -> Vec<Author> {
    let base = profile_base_url.trim_end_matches('/');
    collect_usernames(sources)
        .into_iter()
        .map(|username| Author {
            id: username.clone(),
            url: format!("{base}/{username}"),
            github_username: username,
            avatar: None,
        })
        .collect()
}

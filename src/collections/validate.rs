//! Per-record validation before collections reach the rendering layer.
//!
//! Records with broken identity are dropped one at a time; the rest of their
//! project or collection is emitted unchanged. Malformed optional links are
//! cleared and the row is kept.

use crate::domain::{Author, Briefing, Project, Row};
use std::collections::{BTreeSet, HashSet};
use tracing::warn;

/// Identity problems that make a row unusable, empty when the row is valid.
pub fn row_issues(row: &Row) -> Vec<String> {
    let mut issues = Vec::new();
    if row.id.trim().is_empty() {
        issues.push("empty id".to_string());
    }
    if row.github_username.trim().is_empty() {
        issues.push("empty github_username".to_string());
    }
    if row.author.id() != row.github_username {
        issues.push("author does not match github_username".to_string());
    }
    if row.briefing.id().is_empty() {
        issues.push("empty briefing reference".to_string());
    }
    issues
}

/// Clear link fields that are not http(s) URLs.
pub fn clear_invalid_links(mut row: Row, filename: &str) -> Row {
    for (name, link) in [
        ("project_url", &mut row.project_url),
        ("student_repository_url", &mut row.student_repository_url),
    ] {
        if link.as_deref().is_some_and(|url| !is_http_url(url)) {
            let url = link.take().unwrap_or_default();
            warn!("{}: row '{}': ignoring {} '{}', not an http(s) URL", filename, row.id, name, url);
        }
    }
    row
}

pub fn author_issues(author: &Author) -> Vec<String> {
    let mut issues = Vec::new();
    if author.id.is_empty() || author.id != author.github_username {
        issues.push("id must equal a non-empty github_username".to_string());
    }
    if !is_http_url(&author.url) {
        issues.push(format!("url is not an http(s) URL: {}", author.url));
    }
    issues
}

/// Drop invalid rows and rows repeating an id already seen in the same
/// project, then drop projects left without rows. Surviving rows have their
/// malformed links cleared.
pub fn validate_projects(projects: Vec<Project>) -> Vec<Project> {
    projects
        .into_iter()
        .filter_map(|project| {
            let mut seen = HashSet::new();
            let rows: Vec<Row> = project
                .rows
                .into_iter()
                .filter(|row| {
                    let issues = row_issues(row);
                    if !issues.is_empty() {
                        warn!(
                            "{}: dropping row '{}': {}",
                            project.filename,
                            row.id,
                            issues.join("; ")
                        );
                        return false;
                    }
                    if !seen.insert(row.id.clone()) {
                        warn!("{}: dropping row with duplicate id '{}'", project.filename, row.id);
                        return false;
                    }
                    true
                })
                .map(|row| clear_invalid_links(row, &project.filename))
                .collect();
            if rows.is_empty() {
                warn!("{}: no valid rows; project dropped", project.filename);
                return None;
            }
            Some(Project { rows, ..project })
        })
        .collect()
}

pub fn validate_authors(authors: Vec<Author>) -> Vec<Author> {
    authors
        .into_iter()
        .filter(|author| {
            let issues = author_issues(author);
            if !issues.is_empty() {
                warn!("dropping author '{}': {}", author.id, issues.join("; "));
            }
            issues.is_empty()
        })
        .collect()
}

/// Briefing ids referenced by rows but not present in `briefings`.
///
/// Dangling references are allowed; callers log them.
pub fn dangling_briefings(projects: &[Project], briefings: &[Briefing]) -> BTreeSet<String> {
    let known: HashSet<&str> = briefings.iter().map(|b| b.id.as_str()).collect();
    projects
        .iter()
        .flat_map(|p| p.rows.iter())
        .map(|row| row.briefing.id())
        .filter(|id| !known.contains(id))
        .map(str::to_string)
        .collect()
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuthorRef, BriefingRef};

    fn row(id: &str, user: &str) -> Row {
        Row {
            id: id.to_string(),
            project_title: Some("Alpha".to_string()),
            github_username: user.to_string(),
            student_repository_name: Some("repo-a".to_string()),
            student_repository_url: None,
            project_url: Some("https://hbk-bs.github.io/repo-a".to_string()),
            author: AuthorRef::new(user),
            authors_raw: String::new(),
            authors: Vec::new(),
            briefing: BriefingRef::new("cohort1"),
            screenshot: None,
            colors: None,
        }
    }

    fn project(rows: Vec<Row>) -> Project {
        Project { id: "cohort1".to_string(), filename: "cohort1.csv".to_string(), rows }
    }

    #[test]
    fn invalid_rows_are_dropped_individually() {
        let mut stranger = row("3", "carol");
        stranger.author = AuthorRef::new("dave");
        let projects =
            validate_projects(vec![project(vec![row("1", "alice"), row("", "bob"), stranger])]);
        assert_eq!(projects.len(), 1);
        let ids: Vec<_> = projects[0].rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn malformed_links_are_cleared_and_the_row_is_kept() {
        let mut bare = row("1", "alice");
        bare.student_repository_url = Some("github.com/alice/repo-a".to_string());
        bare.project_url = Some("ftp://hbk-bs.github.io/repo-a".to_string());
        let mut linked = row("2", "bob");
        linked.student_repository_url = Some("https://github.com/bob/repo-b".to_string());

        let projects = validate_projects(vec![project(vec![bare, linked])]);
        assert_eq!(projects.len(), 1);
        let rows = &projects[0].rows;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].student_repository_url, None);
        assert_eq!(rows[0].project_url, None);
        assert_eq!(rows[0].project_title.as_deref(), Some("Alpha"));
        assert_eq!(rows[1].student_repository_url.as_deref(), Some("https://github.com/bob/repo-b"));
    }

    #[test]
    fn duplicate_ids_keep_the_first_row() {
        let projects = validate_projects(vec![project(vec![row("1", "alice"), row("1", "bob")])]);
        assert_eq!(projects[0].rows.len(), 1);
        assert_eq!(projects[0].rows[0].github_username, "alice");
    }

    #[test]
    fn project_without_valid_rows_is_removed() {
        assert!(validate_projects(vec![project(vec![row("1", "")])]).is_empty());
    }

    #[test]
    fn authors_need_matching_id_and_http_url() {
        let good = Author {
            id: "alice".to_string(),
            github_username: "alice".to_string(),
            url: "https://github.com/alice".to_string(),
            avatar: None,
        };
        let bad = Author { url: "github.com/bob".to_string(), ..good.clone() };
        let authors = validate_authors(vec![good.clone(), bad]);
        assert_eq!(authors, vec![good]);
    }

    #[test]
    fn reports_dangling_briefing_references() {
        let briefings = vec![Briefing {
            id: "cohort2".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            body: String::new(),
        }];
        let dangling = dangling_briefings(&[project(vec![row("1", "alice")])], &briefings);
        assert_eq!(dangling.into_iter().collect::<Vec<_>>(), vec!["cohort1".to_string()]);
    }
}

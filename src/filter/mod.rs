//! Row and project filtering pipeline.
//!
//! [`filter_projects`] runs four stages in a fixed order, each consuming the
//! previous stage's output:
//!
//! 1. drop rows by author ([`filter_project_rows_excluding_usernames`])
//! 2. drop rows by title ([`filter_project_rows_excluding_titles`])
//! 3. keep and order projects by an allow-list ([`order_projects`])
//! 4. merge rows sharing a `project_url` ([`dedupe_project_rows_by_url`])
//!
//! A project emptied by any stage is removed rather than emitted empty.
//! Inputs are borrowed and never modified.

use crate::domain::{Author, AuthorRef, Project, Row};
use std::collections::{HashMap, HashSet};

/// Remove rows whose author is in `usernames`, then drop empty projects.
pub fn filter_project_rows_excluding_usernames<S: AsRef<str>>(
    projects: &[Project],
    usernames: &[S],
) -> Vec<Project> {
    let excluded: HashSet<&str> = usernames.iter().map(|s| s.as_ref()).collect();
    retain_rows(projects, |row| !excluded.contains(row.author.id()))
}

/// Remove rows whose title (missing counts as `""`) is in `titles`, then drop
/// empty projects.
pub fn filter_project_rows_excluding_titles<S: AsRef<str>>(
    projects: &[Project],
    titles: &[S],
) -> Vec<Project> {
    let excluded: HashSet<&str> = titles.iter().map(|s| s.as_ref()).collect();
    retain_rows(projects, |row| !excluded.contains(row.title_or_empty()))
}

/// Emit projects in the order of `order`, matched by id.
///
/// `order` is an allow-list: projects it does not name are left out, and ids
/// with no matching project are skipped. An id listed twice is emitted once.
pub fn order_projects<S: AsRef<str>>(projects: &[Project], order: &[S]) -> Vec<Project> {
    let by_id: HashMap<&str, &Project> = projects.iter().map(|p| (p.id.as_str(), p)).collect();
    let mut emitted = HashSet::new();
    order
        .iter()
        .map(|s| s.as_ref())
        .filter(|id| emitted.insert(*id))
        .filter_map(|id| by_id.get(id).map(|p| (*p).clone()))
        .collect()
}

/// Collapse rows sharing a `project_url` into the first such row, whose
/// `authors` lists every distinct contributor in first-seen order.
///
/// Rows without a `project_url` are dropped. Applying this twice gives the
/// same result as applying it once.
pub fn dedupe_project_rows_by_url(projects: &[Project]) -> Vec<Project> {
    projects
        .iter()
        .filter_map(|project| {
            let rows = dedupe_rows(&project.rows);
            if rows.is_empty() {
                None
            } else {
                Some(Project { id: project.id.clone(), filename: project.filename.clone(), rows })
            }
        })
        .collect()
}

fn dedupe_rows(rows: &[Row]) -> Vec<Row> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    rows.iter()
        .filter_map(|row| row.project_url.as_deref().map(|url| (url, row)))
        .fold(Vec::new(), |mut merged: Vec<Row>, (url, row)| {
            let slot = *slots.entry(url).or_insert_with(|| {
                merged.push(Row { authors: Vec::new(), ..row.clone() });
                merged.len() - 1
            });
            let target = &mut merged[slot].authors;
            for author in contributors(row) {
                if !target.contains(author) {
                    target.push(author.clone());
                }
            }
            merged
        })
}

/// The row's own author followed by any authors already merged into it.
fn contributors(row: &Row) -> impl Iterator<Item = &AuthorRef> {
    std::iter::once(&row.author).chain(row.authors.iter())
}

/// Run the full pipeline: exclude users, exclude titles, order, dedupe.
pub fn filter_projects<U, T, O>(
    projects: &[Project],
    users_to_filter: &[U],
    titles_to_filter: &[T],
    project_order: &[O],
) -> Vec<Project>
where
    U: AsRef<str>,
    T: AsRef<str>,
    O: AsRef<str>,
{
    let by_user = filter_project_rows_excluding_usernames(projects, users_to_filter);
    let by_title = filter_project_rows_excluding_titles(&by_user, titles_to_filter);
    let ordered = order_projects(&by_title, project_order);
    dedupe_project_rows_by_url(&ordered)
}

/// Remove authors whose username is in `usernames`.
pub fn filter_authors_excluding_usernames<S: AsRef<str>>(
    authors: &[Author],
    usernames: &[S],
) -> Vec<Author> {
    let excluded: HashSet<&str> = usernames.iter().map(|s| s.as_ref()).collect();
    authors.iter().filter(|a| !excluded.contains(a.github_username.as_str())).cloned().collect()
}

fn retain_rows(projects: &[Project], keep: impl Fn(&Row) -> bool) -> Vec<Project> {
    projects
        .iter()
        .filter_map(|project| {
            let rows: Vec<Row> = project.rows.iter().filter(|&row| keep(row)).cloned().collect();
            if rows.is_empty() {
                None
            } else {
                Some(Project { id: project.id.clone(), filename: project.filename.clone(), rows })
            }
        })
        .collect()
}

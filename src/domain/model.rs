//! Projects, rows, authors and briefings.

use super::palette::ColorEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Reference to an [`Author`] by GitHub username.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorRef(String);

impl AuthorRef {
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to a [`Briefing`] by id.
///
/// The target is not guaranteed to exist; dangling references are reported
/// by `collections::validate::dangling_briefings` and left in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BriefingRef(String);

impl BriefingRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// One CSV record, after derivation of `project_url` and `briefing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub project_title: Option<String>,
    pub github_username: String,
    pub student_repository_name: Option<String>,
    pub student_repository_url: Option<String>,
    pub project_url: Option<String>,
    pub author: AuthorRef,
    /// Raw `authors` column; not used for aggregation.
    #[serde(default)]
    pub authors_raw: String,
    /// Every distinct author merged into this row by URL deduplication.
    #[serde(default)]
    pub authors: Vec<AuthorRef>,
    pub briefing: BriefingRef,
    #[serde(default)]
    pub screenshot: Option<PathBuf>,
    #[serde(default)]
    pub colors: Option<ColorEntry>,
}

impl Row {
    pub fn title_or_empty(&self) -> &str {
        self.project_title.as_deref().unwrap_or("")
    }
}

/// All rows originating from one CSV source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub filename: String,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub github_username: String,
    pub url: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Briefing {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub body: String,
}

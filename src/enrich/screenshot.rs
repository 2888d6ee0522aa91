//! Screenshot path resolution for rows.

use crate::error::ShowcaseError;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ScreenshotLocator {
    root: PathBuf,
    placeholder: Option<PathBuf>,
}

impl ScreenshotLocator {
    pub fn new(root: impl Into<PathBuf>, placeholder: Option<PathBuf>) -> Self {
        Self { root: root.into(), placeholder }
    }

    /// Expected location of a row's capture: `{root}/{project}/{id}.png`.
    pub fn screenshot_path(&self, project_id: &str, row_id: &str) -> PathBuf {
        self.root.join(project_id).join(format!("{row_id}.png"))
    }

    /// The row's own screenshot, else the shared placeholder, else `None`.
    /// Filesystem errors count as a miss.
    pub fn resolve(&self, project_id: &str, row_id: &str) -> Option<PathBuf> {
        match self.lookup(project_id, row_id) {
            Ok(path) => Some(path),
            Err(err) => {
                debug!("{err}");
                None
            }
        }
    }

    fn lookup(&self, project_id: &str, row_id: &str) -> Result<PathBuf, ShowcaseError> {
        let own = self.screenshot_path(project_id, row_id);
        if is_file(&own) {
            return Ok(own);
        }
        if let Some(placeholder) = self.placeholder.as_ref().filter(|p| is_file(p)) {
            return Ok(placeholder.clone());
        }
        Err(ShowcaseError::LookupMiss {
            kind: "screenshot",
            key: format!("{project_id}/{row_id}"),
        })
    }
}

fn is_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

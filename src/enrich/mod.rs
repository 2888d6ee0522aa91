//! Row and author enrichment: screenshots, palettes, avatars.
//!
//! Every lookup here is best effort. A miss leaves the field `None` and the
//! build carries on.

pub mod avatar;
pub mod colors;
pub mod screenshot;

pub use avatar::AvatarCache;
pub use colors::PaletteIndex;
pub use screenshot::ScreenshotLocator;

use crate::domain::{Author, Project, Row};
use crate::utils::normalize_path;
use rayon::prelude::*;

/// Attach screenshot and palette data to every row.
///
/// An empty palette index (no report) skips color lookups entirely; the
/// missing report has already been reported when it was loaded.
pub fn enrich_projects(
    projects: Vec<Project>,
    screenshots: &ScreenshotLocator,
    palette: &PaletteIndex,
) -> Vec<Project> {
    projects
        .into_iter()
        .map(|project| {
            let rows = project
                .rows
                .into_iter()
                .map(|row| Row {
                    screenshot: screenshots.resolve(&project.id, &row.id),
                    colors: if palette.is_empty() { None } else { palette.resolve(&row.id) },
                    ..row
                })
                .collect();
            Project { rows, ..project }
        })
        .collect()
}

/// Resolve avatars for all authors concurrently.
pub fn attach_avatars(authors: Vec<Author>, cache: &AvatarCache) -> Vec<Author> {
    authors
        .into_par_iter()
        .map(|author| {
            let avatar = cache
                .resolve(&author.github_username)
                .map(|path| normalize_path(&path.to_string_lossy()));
            Author { avatar, ..author }
        })
        .collect()
}

//! Core data types shared across ingestion, enrichment and filtering.

pub mod config;
pub mod model;
pub mod palette;
pub mod reports;

pub use config::Config;
pub use model::{Author, AuthorRef, Briefing, BriefingRef, Project, Row};
pub use palette::{ColorEntry, ColorFailure, ColorReport, Swatch, PALETTE_SCHEMA_VERSION};
pub use reports::{ScreenshotFailure, ScreenshotSummary};

/// Columns every project CSV is expected to carry, in canonical order.
pub const CSV_COLUMNS: [&str; 8] = [
    "project_title",
    "github_username",
    "student_repository_name",
    "student_repository_url",
    "project_url",
    "author",
    "authors",
    "id",
];

/// Columns a project CSV header must contain for the file to be usable.
pub const REQUIRED_COLUMNS: [&str; 2] = ["github_username", "id"];

//! Screenshot run reports.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotFailure {
    pub id: String,
    pub url: String,
    pub csv_file: String,
    pub err: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotSummary {
    pub timestamp: String,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub output_directory: String,
    pub errors: Vec<ScreenshotFailure>,
}

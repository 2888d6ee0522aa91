//! Path normalization

use std::path::Path;

pub fn normalize_path(path: &str) -> String {
    // Convert backslashes to forward slashes and normalize
    path.replace('\\', "/")
}

/// `path` relative to `base` when it lies underneath, otherwise unchanged;
/// always with forward slashes.
pub fn display_relative(path: &Path, base: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    normalize_path(&rel.to_string_lossy())
}

/// File name without the given extension, e.g. `cohort1.csv` → `cohort1`.
pub fn file_stem_str(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
}

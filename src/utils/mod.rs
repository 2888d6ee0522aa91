//! Shared helpers: text decoding, paths, progress output.

pub mod encoding;
pub mod paths;
pub mod progress;

pub use encoding::read_text_file;
pub use paths::{display_relative, file_stem_str, normalize_path};
pub use progress::progress_bar;

/// `None` for empty or whitespace-only values, otherwise the trimmed value.
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

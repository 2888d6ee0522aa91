//! Text file reading with BOM handling and legacy-encoding fallback.
//!
//! Rosters are usually UTF-8, but spreadsheet exports occasionally arrive as
//! UTF-8 with a BOM or as Windows-1252. Both decode to the same text here.

use anyhow::{Context, Result};
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use std::path::Path;

const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

/// Read a text file, returning `(content, encoding_label)`.
///
/// Strategy:
/// 1. UTF-8 BOM → strip it and decode as UTF-8
/// 2. strict UTF-8
/// 3. chardetng guess, decoded with replacement characters
pub fn read_text_file(path: &Path) -> Result<(String, String)> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(decode_text(&bytes))
}

pub fn decode_text(bytes: &[u8]) -> (String, String) {
    if let Some(rest) = bytes.strip_prefix(&UTF8_BOM) {
        let (cow, _, _) = UTF_8.decode(rest);
        return (cow.into_owned(), "utf-8-sig".to_string());
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return (text.to_string(), "utf-8".to_string());
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding: &'static Encoding = detector.guess(None, false);
    let (cow, used, _had_errors) = encoding.decode(bytes);
    tracing::debug!("decoded non-UTF-8 input as {}", used.name());
    (cow.into_owned(), used.name().to_lowercase())
}

//! CSV source discovery and loading.

use super::parser::{parse_csv, ColumnSchema, Record};
use crate::utils::read_text_file;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// The parsed records of one roster file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub filename: String,
    pub records: Vec<Record>,
}

impl SourceFile {
    /// Filename with the `.csv` extension stripped; doubles as project id.
    pub fn stem(&self) -> &str {
        self.filename.strip_suffix(".csv").unwrap_or(&self.filename)
    }
}

/// List roster files: `input` itself when it is a CSV file, otherwise the
/// `*.csv` files directly inside it, sorted by name.
pub fn discover_csv_files(input: &Path) -> Result<Vec<PathBuf>> {
    let meta = fs::metadata(input)
        .with_context(|| format!("Input path does not exist: {}", input.display()))?;

    if meta.is_file() {
        if !is_csv(input) {
            anyhow::bail!("Input file must be a CSV file: {}", input.display());
        }
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_csv(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Read and parse every roster under `input` in parallel.
///
/// Files that cannot be read or parsed are logged and left out; the
/// remaining files are returned in name order once all reads have finished.
pub fn load_sources(input: &Path, schema: &ColumnSchema) -> Result<Vec<SourceFile>> {
    let files = discover_csv_files(input)?;
    debug!("found {} CSV file(s) in {}", files.len(), input.display());

    let loaded: Vec<Option<SourceFile>> = files
        .par_iter()
        .map(|path| match load_source(path, schema) {
            Ok(source) => Some(source),
            Err(err) => {
                warn!("{:#}; file excluded", err);
                None
            }
        })
        .collect();

    Ok(loaded.into_iter().flatten().collect())
}

pub fn load_source(path: &Path, schema: &ColumnSchema) -> Result<SourceFile> {
    let filename =
        path.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string();
    let (content, _encoding) = read_text_file(path)?;
    let parsed =
        parse_csv(&content, schema).with_context(|| format!("Failed to parse {}", path.display()))?;

    for malformed in &parsed.malformed {
        warn!("{}: skipping malformed row, {}", filename, malformed);
    }
    if parsed.delimiter == b'|' {
        debug!("{}: parsed as pipe-delimited", filename);
    }
    debug!("{}: {} record(s)", filename, parsed.records.len());

    Ok(SourceFile { path: path.to_path_buf(), filename, records: parsed.records })
}

fn is_csv(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

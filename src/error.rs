//! Error taxonomy for ingestion and enrichment.
//!
//! Only [`ShowcaseError::Schema`] and [`ShowcaseError::Parse`] remove a whole
//! file from the build. Every other variant is contained to a single row or
//! lookup, logged, and replaced by `None` or a skipped record.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShowcaseError {
    #[error("missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("not readable as comma- or pipe-delimited CSV (comma: {comma}; pipe: {pipe})")]
    Parse { comma: String, pipe: String },

    #[error(transparent)]
    MalformedRow(#[from] MalformedRow),

    #[error("no {kind} found for '{key}'")]
    LookupMiss { kind: &'static str, key: String },

    #[error("fetching {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A data line whose field count differs from the header's.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: expected {expected} fields, found {found}")]
pub struct MalformedRow {
    /// 1-based line number in the source text.
    pub line: u64,
    pub expected: usize,
    pub found: usize,
}

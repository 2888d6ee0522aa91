//! Palette lookups against a previously generated color report.

use crate::domain::palette::MAX_PALETTE_COLORS;
use crate::domain::{ColorEntry, ColorReport, PALETTE_SCHEMA_VERSION};
use crate::error::ShowcaseError;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Palette entries keyed by row id, validated when loaded.
#[derive(Debug, Clone, Default)]
pub struct PaletteIndex {
    entries: HashMap<String, ColorEntry>,
}

impl PaletteIndex {
    /// Load the report at `path`. A missing or unreadable report yields an
    /// empty index with a warning; lookups then miss.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(index) => index,
            Err(err) => {
                warn!("{:#}; colors unavailable", err);
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read palette report {}", path.display()))?;
        let report: ColorReport = serde_json::from_str(&content)
            .with_context(|| format!("Invalid palette report {}", path.display()))?;
        Self::from_report(report)
    }

    pub fn from_report(report: ColorReport) -> Result<Self> {
        if report.schema_version > PALETTE_SCHEMA_VERSION {
            anyhow::bail!(
                "palette report schema version {} is newer than supported version {}",
                report.schema_version,
                PALETTE_SCHEMA_VERSION
            );
        }

        let mut entries = HashMap::new();
        for entry in report.colors {
            if let Some(problem) = entry_problem(&entry) {
                warn!("palette entry '{}' ignored: {}", entry.id, problem);
                continue;
            }
            if entries.contains_key(&entry.id) {
                warn!("palette entry '{}' appears more than once; keeping the first", entry.id);
                continue;
            }
            entries.insert(entry.id.clone(), entry);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, id: &str) -> Result<&ColorEntry, ShowcaseError> {
        self.entries
            .get(id)
            .ok_or_else(|| ShowcaseError::LookupMiss { kind: "palette entry", key: id.to_string() })
    }

    /// Palette for `id`, or `None` with a warning.
    pub fn resolve(&self, id: &str) -> Option<ColorEntry> {
        match self.lookup(id) {
            Ok(entry) => Some(entry.clone()),
            Err(err) => {
                warn!("{err}");
                None
            }
        }
    }
}

fn entry_problem(entry: &ColorEntry) -> Option<String> {
    if entry.id.trim().is_empty() {
        return Some("empty id".to_string());
    }
    if entry.colors.len() > MAX_PALETTE_COLORS {
        return Some(format!("{} palette colors (max {})", entry.colors.len(), MAX_PALETTE_COLORS));
    }
    std::iter::once(&entry.dominant_color)
        .chain(entry.colors.iter())
        .find(|swatch| !swatch.is_consistent())
        .map(|swatch| format!("hex {} does not match rgb {:?}", swatch.hex, swatch.rgb))
}

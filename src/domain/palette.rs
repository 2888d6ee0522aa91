//! Palette report schema.
//!
//! The report is produced by `showcase colors` and consumed during the build.
//! It is validated once when loaded (see `enrich::colors::PaletteIndex`)
//! rather than trusted field by field at each lookup.

use serde::{Deserialize, Serialize};

/// Bumped whenever the on-disk layout of [`ColorReport`] changes.
/// Reports written before the field existed deserialize as version 1.
pub const PALETTE_SCHEMA_VERSION: u32 = 1;

/// Maximum number of palette colors stored per image.
pub const MAX_PALETTE_COLORS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swatch {
    pub rgb: [u8; 3],
    pub hex: String,
}

impl Swatch {
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        Self { rgb, hex: format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2]) }
    }

    /// Whether `hex` is the `#rrggbb` rendering of `rgb`.
    pub fn is_consistent(&self) -> bool {
        self.hex.eq_ignore_ascii_case(&Swatch::from_rgb(self.rgb).hex)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorEntry {
    pub id: String,
    pub image_path: String,
    pub dominant_color: Swatch,
    pub colors: Vec<Swatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorFailure {
    pub image_path: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorReport {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub timestamp: String,
    pub total_images: usize,
    pub processed: usize,
    pub failed: usize,
    pub output_path: String,
    pub colors: Vec<ColorEntry>,
    #[serde(default)]
    pub errors: Vec<ColorFailure>,
}

fn default_schema_version() -> u32 {
    1
}

//! Palette extraction from captured screenshots.
//!
//! Each PNG is downscaled, its pixels are bucketed into a coarse RGB
//! histogram, and the most populous buckets that are not near-duplicates of
//! an already chosen color become the palette.

use crate::domain::palette::MAX_PALETTE_COLORS;
use crate::domain::{ColorEntry, ColorFailure, ColorReport, Swatch, PALETTE_SCHEMA_VERSION};
use crate::utils::{file_stem_str, normalize_path, progress_bar};
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Longest edge of the thumbnail that is sampled.
const SAMPLE_EDGE: u32 = 100;
/// Bits kept per channel when bucketing.
const BUCKET_BITS: u8 = 4;
/// Squared RGB distance below which two colors count as the same swatch.
const MIN_DISTANCE_SQ: u32 = 32 * 32;
/// HSV saturation a color needs to be picked as dominant over a more
/// populous gray.
const DOMINANT_MIN_SATURATION: f32 = 0.2;

/// Run reports written by `showcase screenshots` live next to the captures.
const REPORT_PATTERNS: [&str; 2] = ["errors-*", "summary-*"];

fn report_globset() -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in REPORT_PATTERNS {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// PNG files directly under `dir` or one directory below it, sorted.
pub fn find_screenshots(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("Screenshot directory not found: {}", dir.display());
    }
    let skip = report_globset()?;

    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(2)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_png(path))
        .filter(|path| path.file_name().is_some_and(|name| !skip.is_match(name)))
        .collect();
    found.sort();
    Ok(found)
}

fn is_png(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub dominant: Swatch,
    pub colors: Vec<Swatch>,
}

/// Extract up to five representative colors from the image at `path`.
pub fn extract_palette(path: &Path) -> Result<Palette> {
    let image = image::open(path)
        .with_context(|| format!("Failed to decode image {}", path.display()))?;
    let pixels = image.thumbnail(SAMPLE_EDGE, SAMPLE_EDGE).to_rgb8();
    palette_from_pixels(pixels.pixels().map(|p| p.0))
        .with_context(|| format!("Image has no pixels: {}", path.display()))
}

#[derive(Default)]
struct Bucket {
    count: u32,
    sum: [u64; 3],
}

impl Bucket {
    fn mean(&self) -> [u8; 3] {
        let n = u64::from(self.count.max(1));
        [(self.sum[0] / n) as u8, (self.sum[1] / n) as u8, (self.sum[2] / n) as u8]
    }
}

fn palette_from_pixels(pixels: impl Iterator<Item = [u8; 3]>) -> Option<Palette> {
    let shift = 8 - BUCKET_BITS;
    let mut buckets: HashMap<[u8; 3], Bucket> = HashMap::new();
    for rgb in pixels {
        let bucket = buckets.entry([rgb[0] >> shift, rgb[1] >> shift, rgb[2] >> shift]).or_default();
        bucket.count += 1;
        for (sum, channel) in bucket.sum.iter_mut().zip(rgb) {
            *sum += u64::from(channel);
        }
    }

    let mut ranked: Vec<([u8; 3], Bucket)> = buckets.into_iter().collect();
    ranked.sort_by(|(ka, a), (kb, b)| b.count.cmp(&a.count).then_with(|| ka.cmp(kb)));

    let mut chosen: Vec<[u8; 3]> = Vec::new();
    for (_, bucket) in &ranked {
        let rgb = bucket.mean();
        if chosen.iter().all(|c| distance_sq(*c, rgb) >= MIN_DISTANCE_SQ) {
            chosen.push(rgb);
            if chosen.len() == MAX_PALETTE_COLORS {
                break;
            }
        }
    }

    let first = *chosen.first()?;
    let dominant =
        chosen.iter().copied().find(|c| saturation(*c) >= DOMINANT_MIN_SATURATION).unwrap_or(first);
    Some(Palette {
        dominant: Swatch::from_rgb(dominant),
        colors: chosen.into_iter().map(Swatch::from_rgb).collect(),
    })
}

fn distance_sq(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = i32::from(*x) - i32::from(y);
            (d * d) as u32
        })
        .sum()
}

fn saturation(rgb: [u8; 3]) -> f32 {
    let max = rgb.iter().copied().max().unwrap_or(0);
    let min = rgb.iter().copied().min().unwrap_or(0);
    if max == 0 {
        0.0
    } else {
        f32::from(max - min) / f32::from(max)
    }
}

/// Extract palettes for every screenshot under `input` and write the report
/// to `output`. Per-image failures are recorded in the report, not returned.
pub fn build_color_report(input: &Path, output: &Path) -> Result<ColorReport> {
    let images = find_screenshots(input)?;
    info!("extracting palettes from {} screenshot(s)", images.len());

    let bar = progress_bar(images.len(), "Extracting colors");
    let results: Vec<(String, Result<Palette>)> = images
        .par_iter()
        .map(|path| {
            let result = extract_palette(path);
            bar.inc(1);
            (normalize_path(&path.to_string_lossy()), result)
        })
        .collect();
    bar.finish_and_clear();

    let mut colors = Vec::new();
    let mut errors = Vec::new();
    for (image_path, result) in results {
        match result {
            Ok(palette) => {
                let id = file_stem_str(Path::new(&image_path)).unwrap_or_default();
                debug!("{} -> {}", image_path, palette.dominant.hex);
                colors.push(ColorEntry {
                    id,
                    image_path,
                    dominant_color: palette.dominant,
                    colors: palette.colors,
                });
            }
            Err(err) => {
                warn!("{:#}", err);
                errors.push(ColorFailure { image_path, error: format!("{:#}", err) });
            }
        }
    }

    let report = ColorReport {
        schema_version: PALETTE_SCHEMA_VERSION,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        total_images: images.len(),
        processed: colors.len(),
        failed: errors.len(),
        output_path: normalize_path(&output.to_string_lossy()),
        colors,
        errors,
    };
    crate::render::write_json(output, &report)?;
    info!("wrote {} palette(s) to {}", report.processed, output.display());
    Ok(report)
}

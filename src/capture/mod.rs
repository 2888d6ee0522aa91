//! Page screenshots for every roster row.
//!
//! Capturing is delegated to a [`PageCapture`] implementation; the default
//! drives a headless Chromium-compatible browser as an external process.

use crate::collections::derive_project_url;
use crate::domain::{ScreenshotFailure, ScreenshotSummary};
use crate::ingest::{load_sources, ColumnSchema, SourceFile};
use crate::utils::{non_blank, normalize_path, progress_bar};
use anyhow::{Context, Result};
use chrono::{NaiveDate, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Roster columns the capture run reads. Only `id` has to be present.
pub const CAPTURE_SCHEMA: ColumnSchema = ColumnSchema {
    columns: &[
        "id",
        "project_title",
        "project_url",
        "student_repository_name",
        "student_repository_url",
    ],
    required: &["id"],
};

pub const VIEWPORT: (u32, u32) = (1440, 900);

const NO_URL: &str = "No URL found";
const NO_URL_REASON: &str = "Missing both project_url and student_repository_url";

/// Renders `url` into a PNG at `dest`.
pub trait PageCapture {
    fn capture(&self, url: &str, dest: &Path) -> Result<()>;
}

/// A headless browser binary invoked once per page.
pub struct HeadlessBrowser {
    program: String,
    timeout: Duration,
}

impl HeadlessBrowser {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self { program: program.into(), timeout }
    }

    fn command(&self, url: &str, dest: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--headless")
            .arg("--hide-scrollbars")
            .arg(format!("--window-size={},{}", VIEWPORT.0, VIEWPORT.1))
            .arg(format!("--screenshot={}", dest.display()))
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl PageCapture for HeadlessBrowser {
    fn capture(&self, url: &str, dest: &Path) -> Result<()> {
        let mut child = self
            .command(url, dest)
            .spawn()
            .with_context(|| format!("Failed to start browser '{}'", self.program))?;

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                anyhow::bail!("Timeout {}ms exceeded", self.timeout.as_millis());
            }
            thread::sleep(Duration::from_millis(100));
        };

        if !status.success() {
            anyhow::bail!("browser exited with {status}");
        }
        if !dest.is_file() {
            anyhow::bail!("browser produced no screenshot at {}", dest.display());
        }
        Ok(())
    }
}

/// One row to capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureTarget {
    pub id: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub csv_file: String,
    pub dest: PathBuf,
}

/// One target per row, written to `{out_dir}/{csv stem}/{id}.png`.
/// The page is the row's own `project_url`, then the published page derived
/// from `student_repository_name`, then `student_repository_url`.
pub fn plan_captures(
    sources: &[SourceFile],
    out_dir: &Path,
    pages_base_url: &str,
) -> Vec<CaptureTarget> {
    sources
        .iter()
        .flat_map(|source| {
            let dir = out_dir.join(source.stem());
            source.records.iter().map(move |record| {
                let field = |name: &str| record.get(name).and_then(|v| non_blank(v));
                let id = field("id").unwrap_or_default();
                CaptureTarget {
                    dest: dir.join(format!("{id}.png")),
                    title: field("project_title"),
                    url: field("project_url")
                        .or_else(|| {
                            derive_project_url(
                                pages_base_url,
                                field("student_repository_name").as_deref(),
                            )
                        })
                        .or_else(|| field("student_repository_url")),
                    csv_file: source.filename.clone(),
                    id,
                }
            })
        })
        .collect()
}

/// Capture every target in order. Failures are collected, never returned.
pub fn run_captures(
    targets: &[CaptureTarget],
    capturer: &dyn PageCapture,
    out_dir: &Path,
) -> ScreenshotSummary {
    let bar = progress_bar(targets.len(), "Capturing");
    let mut errors = Vec::new();
    let mut successful = 0;

    for target in targets {
        match capture_one(target, capturer) {
            Ok(()) => {
                debug!("captured {} {}", target.id, target.title.as_deref().unwrap_or_default());
                successful += 1;
            }
            Err(failure) => {
                warn!("{} ({}): {}", failure.id, failure.csv_file, failure.err);
                errors.push(failure);
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    ScreenshotSummary {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        total: targets.len(),
        successful,
        failed: errors.len(),
        output_directory: normalize_path(&out_dir.to_string_lossy()),
        errors,
    }
}

fn capture_one(target: &CaptureTarget, capturer: &dyn PageCapture) -> Result<(), ScreenshotFailure> {
    let failure = |url: &str, err: String| ScreenshotFailure {
        id: target.id.clone(),
        url: url.to_string(),
        csv_file: target.csv_file.clone(),
        err,
    };

    let Some(url) = target.url.as_deref() else {
        return Err(failure(NO_URL, NO_URL_REASON.to_string()));
    };
    if target.id.is_empty() {
        return Err(failure(url, "Missing id; run `showcase backfill-ids` first".to_string()));
    }
    if let Some(parent) = target.dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| failure(url, e.to_string()))?;
    }
    capturer.capture(url, &target.dest).map_err(|e| failure(url, format!("{:#}", e)))
}

/// Write `errors-YYYYMMDD.json` (only when something failed) and
/// `summary-YYYYMMDD.json` into `dir`. Returns the written paths.
pub fn write_run_reports(
    summary: &ScreenshotSummary,
    dir: &Path,
    date: NaiveDate,
) -> Result<Vec<PathBuf>> {
    let stamp = date.format("%Y%m%d");
    let mut written = Vec::new();

    if !summary.errors.is_empty() {
        let path = dir.join(format!("errors-{stamp}.json"));
        crate::render::write_json(&path, &summary.errors)?;
        written.push(path);
    }
    let path = dir.join(format!("summary-{stamp}.json"));
    crate::render::write_json(&path, summary)?;
    written.push(path);
    Ok(written)
}

/// Load rosters from `input`, capture every row into `out_dir`, and write
/// the run reports next to the captures.
pub fn capture_screenshots(
    input: &Path,
    out_dir: &Path,
    pages_base_url: &str,
    capturer: &dyn PageCapture,
) -> Result<ScreenshotSummary> {
    let sources = load_sources(input, &CAPTURE_SCHEMA)?;
    let targets = plan_captures(&sources, out_dir, pages_base_url);
    info!("capturing {} page(s) into {}", targets.len(), out_dir.display());

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let summary = run_captures(&targets, capturer, out_dir);
    write_run_reports(&summary, out_dir, Utc::now().date_naive())?;
    info!("{} captured, {} failed", summary.successful, summary.failed);
    Ok(summary)
}

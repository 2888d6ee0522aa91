//! Screenshots command implementation

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;
use std::time::Duration;

use super::ConfigArgs;
use crate::capture::{capture_screenshots, HeadlessBrowser};
use crate::config::CliOverrides;

#[derive(Args)]
pub struct ScreenshotsArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// CSV roster file or directory of rosters
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output directory for screenshots
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Headless browser executable
    #[arg(long, value_name = "PROGRAM")]
    pub browser: Option<String>,

    /// Per-page timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

pub fn run(args: ScreenshotsArgs) -> Result<()> {
    let config = args.config.resolve(CliOverrides {
        projects_dir: args.input.clone(),
        screenshots_dir: args.output.clone(),
        browser: args.browser.clone(),
        screenshot_timeout_secs: args.timeout,
        ..CliOverrides::default()
    })?;

    let browser =
        HeadlessBrowser::new(&config.browser, Duration::from_secs(config.screenshot_timeout_secs));
    let summary = capture_screenshots(
        &config.projects_dir,
        &config.screenshots_dir,
        &config.pages_base_url,
        &browser,
    )?;

    println!(
        "{} {} of {} page(s) captured into {}",
        style("Screenshots:").bold(),
        summary.successful,
        summary.total,
        summary.output_directory
    );
    if summary.failed > 0 {
        for failure in &summary.errors {
            println!("  {} {} ({}): {}", style("✗").red(), failure.id, failure.csv_file, failure.err);
        }
        anyhow::bail!("{} screenshot(s) failed", summary.failed);
    }
    Ok(())
}

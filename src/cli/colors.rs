//! Colors command implementation

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;

use super::ConfigArgs;
use crate::config::CliOverrides;
use crate::palette::build_color_report;

#[derive(Args)]
pub struct ColorsArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Screenshot directory to scan
    #[arg(short, long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Palette report to write
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: ColorsArgs) -> Result<()> {
    let config = args.config.resolve(CliOverrides {
        screenshots_dir: args.input.clone(),
        colors_report: args.output.clone(),
        ..CliOverrides::default()
    })?;

    let report = build_color_report(&config.screenshots_dir, &config.colors_report)?;

    println!(
        "{} {} of {} image(s) processed, written to {}",
        style("Colors:").bold(),
        report.processed,
        report.total_images,
        report.output_path
    );
    if report.failed > 0 {
        for failure in &report.errors {
            println!("  {} {}: {}", style("✗").red(), failure.image_path, failure.error);
        }
        anyhow::bail!("{} image(s) failed", report.failed);
    }
    Ok(())
}

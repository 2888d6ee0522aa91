//! Build command implementation

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;
use std::time::Duration;

use super::utils::parse_csv;
use super::ConfigArgs;
use crate::collections::build_collections;
use crate::config::CliOverrides;
use crate::enrich::AvatarCache;
use crate::render::write_collections;
use crate::utils::display_relative;

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// CSV roster file or directory of rosters
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Directory the collection JSON files are written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory of briefing markdown files
    #[arg(long, value_name = "DIR")]
    pub briefings_dir: Option<PathBuf>,

    /// Root of the captured screenshots
    #[arg(long, value_name = "DIR")]
    pub screenshots_dir: Option<PathBuf>,

    /// Palette report produced by `showcase colors`
    #[arg(long, value_name = "FILE")]
    pub colors_report: Option<PathBuf>,

    /// Avatar cache directory
    #[arg(long, value_name = "DIR")]
    pub avatars_dir: Option<PathBuf>,

    /// Leave out rows by these authors (comma-separated usernames)
    #[arg(long, value_name = "USERS")]
    pub exclude_users: Option<String>,

    /// Leave out rows with these titles (comma-separated)
    #[arg(long, value_name = "TITLES")]
    pub exclude_titles: Option<String>,

    /// Keep only these projects, in this order (comma-separated ids)
    #[arg(long, value_name = "IDS")]
    pub project_order: Option<String>,

    /// Use cached avatars only; never download
    #[arg(long)]
    pub offline: bool,

    /// Omit the generation timestamp from build.json
    #[arg(long)]
    pub no_timestamp: bool,
}

pub fn run(args: BuildArgs) -> Result<()> {
    let config = args.config.resolve(CliOverrides {
        projects_dir: args.input.clone(),
        briefings_dir: args.briefings_dir.clone(),
        screenshots_dir: args.screenshots_dir.clone(),
        colors_report: args.colors_report.clone(),
        avatars_dir: args.avatars_dir.clone(),
        output_dir: args.output_dir.clone(),
        exclude_users: parse_csv(&args.exclude_users),
        exclude_titles: parse_csv(&args.exclude_titles),
        project_order: parse_csv(&args.project_order),
        ..CliOverrides::default()
    })?;

    let avatars = if args.offline {
        AvatarCache::offline(&config.avatars_dir)
    } else {
        AvatarCache::new(
            &config.avatars_dir,
            &config.avatar_base_url,
            Duration::from_secs(config.avatar_timeout_secs),
        )?
    };

    let collections = build_collections(&config, &avatars)?;
    let written = write_collections(&config.output_dir, &collections, !args.no_timestamp)?;

    let rows: usize = collections.projects.iter().map(|p| p.rows.len()).sum();
    println!(
        "{} {} project(s), {} row(s), {} author(s), {} briefing(s)",
        style("Built").green().bold(),
        collections.projects.len(),
        rows,
        collections.authors.len(),
        collections.briefings.len()
    );
    let cwd = std::env::current_dir()?;
    for path in written {
        println!("  {}", display_relative(&path, &cwd));
    }
    Ok(())
}

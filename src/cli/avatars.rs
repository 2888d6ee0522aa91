//! Avatars command implementation

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;
use std::time::Duration;

use super::ConfigArgs;
use crate::collections::collect_usernames;
use crate::config::CliOverrides;
use crate::enrich::AvatarCache;
use crate::ingest::{load_sources, PROJECT_SCHEMA};
use crate::utils::progress_bar;

#[derive(Args)]
pub struct AvatarsArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// CSV roster file or directory of rosters
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Avatar cache directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

pub fn run(args: AvatarsArgs) -> Result<()> {
    let config = args.config.resolve(CliOverrides {
        projects_dir: args.input.clone(),
        avatars_dir: args.output.clone(),
        avatar_timeout_secs: args.timeout,
        ..CliOverrides::default()
    })?;

    let sources = load_sources(&config.projects_dir, &PROJECT_SCHEMA)?;
    let usernames = collect_usernames(&sources);
    let cache = AvatarCache::new(
        &config.avatars_dir,
        &config.avatar_base_url,
        Duration::from_secs(config.avatar_timeout_secs),
    )?;

    let bar = progress_bar(usernames.len(), "Fetching avatars");
    let missing: Vec<&String> = usernames
        .iter()
        .filter(|username| {
            let found = cache.resolve(username).is_some();
            bar.inc(1);
            !found
        })
        .collect();
    bar.finish_and_clear();

    println!(
        "{} {} of {} cached in {}",
        style("Avatars:").bold(),
        usernames.len() - missing.len(),
        usernames.len(),
        cache.dir().display()
    );
    for username in &missing {
        println!("  {} {}", style("✗").yellow(), username);
    }
    Ok(())
}

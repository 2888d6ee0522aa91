//! Command-line interface for showcase
//!
//! `build` assembles the content collections; the remaining subcommands are
//! the collaborator steps that prepare its inputs.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::Config;

mod avatars;
mod backfill;
mod build;
mod colors;
mod screenshots;
mod utils;

/// Build the student project showcase from CSV rosters
#[derive(Parser)]
#[command(name = "showcase")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble projects, authors and briefings into JSON collections
    Build(build::BuildArgs),

    /// Assign UUIDs to roster rows with a blank id
    BackfillIds(backfill::BackfillArgs),

    /// Capture a screenshot of every project page
    Screenshots(screenshots::ScreenshotsArgs),

    /// Extract color palettes from captured screenshots
    Colors(colors::ColorsArgs),

    /// Download missing author avatars into the cache
    Avatars(avatars::AvatarsArgs),
}

/// Options shared by every command that reads the config file.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Config file (default: showcase.toml / showcase.yml in the current directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn resolve(&self, overrides: CliOverrides) -> Result<Config> {
        let cwd = std::env::current_dir()?;
        let file_config = load_config(&cwd, self.config.as_deref())?;
        Ok(merge_cli_with_config(file_config, overrides))
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Build(args) => build::run(args),
        Commands::BackfillIds(args) => backfill::run(args),
        Commands::Screenshots(args) => screenshots::run(args),
        Commands::Colors(args) => colors::run(args),
        Commands::Avatars(args) => avatars::run(args),
    }
}

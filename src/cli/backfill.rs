//! Backfill-ids command implementation

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;
use tracing::warn;

use crate::ingest::{backfill_file, discover_csv_files, BackfillOutcome};

#[derive(Args)]
pub struct BackfillArgs {
    /// CSV roster file or directory of rosters
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

pub fn run(args: BackfillArgs) -> Result<()> {
    let files = discover_csv_files(&args.path)?;
    let single = files.len() == 1 && args.path.is_file();

    let mut failures = 0;
    for file in &files {
        match backfill_file(file) {
            Ok(BackfillOutcome::Updated { assigned }) => {
                println!(
                    "{} {} ({} ids assigned)",
                    style("Updated:").green(),
                    file.display(),
                    assigned
                );
            }
            Ok(BackfillOutcome::Unchanged) => {
                println!("No changes made.");
            }
            // A single named file fails the command; in a directory run the
            // other rosters are still processed.
            Err(err) if single => return Err(err),
            Err(err) => {
                warn!("{:#}", err);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} roster(s) could not be backfilled");
    }
    Ok(())
}

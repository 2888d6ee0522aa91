//! Roster ingestion: CSV parsing, file loading, id backfill.

pub mod backfill;
pub mod loader;
pub mod parser;

pub use backfill::{backfill_file, BackfillOutcome};
pub use loader::{discover_csv_files, load_sources, SourceFile};
pub use parser::{parse_csv, parse_table, ColumnSchema, ParsedCsv, Record, PROJECT_SCHEMA};

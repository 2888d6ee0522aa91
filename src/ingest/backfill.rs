//! Assign stable ids to roster rows that lack one.

use super::parser::{parse_table, CsvTable};
use crate::error::ShowcaseError;
use crate::utils::read_text_file;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;
use uuid::Uuid;

const ID_COLUMN: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackfillOutcome {
    /// The file was rewritten with `assigned` new ids.
    Updated { assigned: usize },
    /// Every row already had an id; the file was not touched.
    Unchanged,
}

/// Whether an id value counts as absent (blank once quotes are ignored).
pub fn needs_id(value: &str) -> bool {
    value.replace('"', "").trim().is_empty()
}

pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Return `table` with a fresh UUID in every blank `id` cell, and the number
/// of ids assigned. Rows that already carry an id keep it.
pub fn backfill_table(table: CsvTable) -> Result<(CsvTable, usize), ShowcaseError> {
    let idx = table
        .column_index(ID_COLUMN)
        .ok_or_else(|| ShowcaseError::Schema { missing: vec![ID_COLUMN.to_string()] })?;

    let (rows, assigned) = table.rows.into_iter().fold(
        (Vec::new(), 0usize),
        |(mut rows, assigned), mut row| {
            let blank = row.fields.get(idx).map_or(true, |v| needs_id(v));
            if blank {
                row.fields[idx] = generate_id();
            }
            rows.push(row);
            (rows, assigned + usize::from(blank))
        },
    );

    Ok((CsvTable { rows, ..table }, assigned))
}

/// Backfill ids in the roster at `path`, rewriting it only when at least one
/// id was assigned. Malformed rows are dropped from the rewritten file.
pub fn backfill_file(path: &Path) -> Result<BackfillOutcome> {
    let (content, _encoding) = read_text_file(path)?;
    let table = parse_table(&content, &[ID_COLUMN])
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let (table, assigned) = backfill_table(table)?;
    if assigned == 0 {
        return Ok(BackfillOutcome::Unchanged);
    }

    for malformed in &table.malformed {
        warn!("{}: dropping malformed row, {}", path.display(), malformed);
    }

    let bytes = write_table(&table)?;
    std::fs::write(path, bytes).with_context(|| format!("Failed writing {}", path.display()))?;
    Ok(BackfillOutcome::Updated { assigned })
}

fn write_table(table: &CsvTable) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(table.delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(&row.fields)?;
    }
    writer.into_inner().map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))
}

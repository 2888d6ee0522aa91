//! CSV row parsing with a comma → pipe dialect fallback.

use crate::domain::{CSV_COLUMNS, REQUIRED_COLUMNS};
use crate::error::{MalformedRow, ShowcaseError};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// One parsed data line keyed by column name.
pub type Record = BTreeMap<String, String>;

/// Expected columns of a CSV file and the subset its header must contain.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSchema {
    pub columns: &'static [&'static str],
    pub required: &'static [&'static str],
}

/// Schema of the project roster files.
pub const PROJECT_SCHEMA: ColumnSchema =
    ColumnSchema { columns: &CSV_COLUMNS, required: &REQUIRED_COLUMNS };

/// Delimiters tried in order.
const DIALECTS: [u8; 2] = [b',', b'|'];

/// A data line with its 1-based starting line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub line: u64,
    pub fields: Vec<String>,
}

/// Header plus well-formed data lines, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<TableRow>,
    pub malformed: Vec<MalformedRow>,
    pub delimiter: u8,
}

impl CsvTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCsv {
    pub records: Vec<Record>,
    pub malformed: Vec<MalformedRow>,
    pub delimiter: u8,
}

/// Parse roster text into one [`Record`] per retained line.
///
/// Every column of `schema` is present in each record; columns the header
/// lacks default to the empty string.
pub fn parse_csv(content: &str, schema: &ColumnSchema) -> Result<ParsedCsv, ShowcaseError> {
    let table = parse_table(content, schema.required)?;

    let indices: Vec<(&str, Option<usize>)> =
        schema.columns.iter().map(|col| (*col, table.column_index(col))).collect();

    let records = table
        .rows
        .iter()
        .map(|row| {
            indices
                .iter()
                .map(|(col, idx)| {
                    let value = idx.and_then(|i| row.fields.get(i)).cloned().unwrap_or_default();
                    (col.to_string(), value)
                })
                .collect::<Record>()
        })
        .collect();

    Ok(ParsedCsv { records, malformed: table.malformed, delimiter: table.delimiter })
}

/// Read `content` as a table, trying a comma first and a pipe second.
///
/// The pipe dialect is attempted when the comma pass fails or produces no
/// usable rows. A header-only file parses as an empty table. When both passes
/// miss required columns the comma pass's [`ShowcaseError::Schema`] is
/// returned; any other double failure (e.g. no header line at all) is a
/// [`ShowcaseError::Parse`] carrying both reasons.
pub fn parse_table(content: &str, required: &[&str]) -> Result<CsvTable, ShowcaseError> {
    let comma = match read_table(content, DIALECTS[0], required) {
        Ok(table) if !table.rows.is_empty() => return Ok(table),
        other => other,
    };

    debug!("comma-delimited pass yielded no rows; retrying with pipe delimiter");
    let pipe = read_table(content, DIALECTS[1], required);

    match (comma, pipe) {
        (_, Ok(table)) if !table.rows.is_empty() => Ok(table),
        (Ok(table), _) => Ok(table),
        (Err(_), Ok(table)) => Ok(table),
        (Err(PassError::Schema(missing)), Err(PassError::Schema(_))) => {
            Err(ShowcaseError::Schema { missing })
        }
        (Err(comma), Err(pipe)) => {
            Err(ShowcaseError::Parse { comma: comma.to_string(), pipe: pipe.to_string() })
        }
    }
}

/// Why a single dialect pass could not produce a table.
#[derive(Debug)]
enum PassError {
    Schema(Vec<String>),
    Unreadable(String),
}

impl fmt::Display for PassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassError::Schema(missing) => {
                write!(f, "missing required column(s): {}", missing.join(", "))
            }
            PassError::Unreadable(reason) => f.write_str(reason),
        }
    }
}

fn read_table(content: &str, delimiter: u8, required: &[&str]) -> Result<CsvTable, PassError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    let mut malformed = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| PassError::Unreadable(e.to_string()))?;
        if is_blank(&record) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let Some(columns) = &header else {
            header = Some(record.iter().map(normalize_header).collect());
            continue;
        };

        if record.len() != columns.len() {
            malformed.push(MalformedRow { line, expected: columns.len(), found: record.len() });
            continue;
        }
        rows.push(TableRow { line, fields: record.iter().map(strip_quotes).collect() });
    }

    let Some(header) = header else {
        return Err(PassError::Unreadable("no header line".to_string()));
    };
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !header.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PassError::Schema(missing));
    }

    Ok(CsvTable { header, rows, malformed, delimiter })
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|f| f.trim().is_empty())
}

fn normalize_header(raw: &str) -> String {
    strip_quotes(raw.trim_start_matches('\u{feff}').trim())
}

/// Remove one pair of surrounding double quotes left by lenient quoting.
fn strip_quotes(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}

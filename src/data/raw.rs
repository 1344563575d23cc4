use serde::{Deserialize, Serialize};

use super::error::DataError;

/// Cell delimiter of every supported input.
pub const DELIMITER: u8 = b',';

// ---------------------------------------------------------------------------
// Parse options
// ---------------------------------------------------------------------------

/// How much of the input to ignore and whether the first kept row names the
/// columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub skip_rows: usize,
    pub skip_cols: usize,
    pub has_header: bool,
}

// ---------------------------------------------------------------------------
// RawTable – untyped rectangular grid of cells
// ---------------------------------------------------------------------------

/// A rectangular table of string cells with one identifier per column.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Header names, or `col0`, `col1`, … when the input has no header.
    pub columns: Vec<String>,
    /// Data rows; every row has `columns.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Position of the column named `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `max_rows` data rows, for previews.
    pub fn head(&self, max_rows: usize) -> &[Vec<String>] {
        &self.rows[..self.rows.len().min(max_rows)]
    }

    /// Re-join the data rows with the delimiter, one row per line.
    pub fn to_delimited(&self) -> String {
        let delimiter = char::from(DELIMITER).to_string();
        self.rows
            .iter()
            .map(|row| row.join(&delimiter))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Split already-decoded text into a [`RawTable`].
///
/// Carriage returns are dropped before splitting, then the first
/// `skip_rows` lines and the first `skip_cols` cells of each remaining row
/// are discarded. Cells are split on every comma; quotes are ordinary
/// characters. The parse fails as a whole: either every kept row has the
/// same width or nothing is returned.
pub fn parse(text: &str, options: &ParseOptions) -> Result<RawTable, DataError> {
    let normalized = text.replace('\r', "");

    // Skipped lines are counted before the reader sees them, blank or not.
    let body = normalized
        .splitn(options.skip_rows + 1, '\n')
        .nth(options.skip_rows)
        .unwrap_or("");
    let line_offset = options.skip_rows as u64;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(DELIMITER)
        .from_reader(body.as_bytes());

    let mut kept: Vec<(u64, Vec<String>)> = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line() + line_offset);
        let cells: Vec<String> = record
            .iter()
            .skip(options.skip_cols)
            .map(str::to_string)
            .collect();
        kept.push((line, cells));
    }

    let expected = match kept.first() {
        Some((_, cells)) if !cells.is_empty() => cells.len(),
        _ => return Err(DataError::EmptyTable),
    };

    for (row, (line, cells)) in kept.iter().enumerate() {
        if cells.len() != expected {
            return Err(DataError::MalformedRow {
                row,
                line: *line,
                expected,
                found: cells.len(),
            });
        }
    }

    let mut rows: Vec<Vec<String>> = kept.into_iter().map(|(_, cells)| cells).collect();

    let columns = if options.has_header {
        let header: Vec<String> = rows.remove(0).into_iter().map(|h| h.trim().to_string()).collect();
        for (i, name) in header.iter().enumerate() {
            if header[..i].contains(name) {
                log::warn!("Duplicate column name '{name}'; lookups use the first occurrence");
            }
        }
        header
    } else {
        (0..expected).map(|i| format!("col{i}")).collect()
    };

    if rows.is_empty() {
        return Err(DataError::EmptyTable);
    }

    Ok(RawTable { columns, rows })
}

use anyhow::{Context, Result};

use super::envelope::compute_envelope;
use super::loader::{InputSource, LoadOptions};
use super::model::{Envelope, TimeSeriesTable};
use super::normalize::normalize;
use super::outlier::filter_all;
use super::raw::{parse, RawTable};

/// One loaded dataset with everything derived from it.
///
/// Built wholesale on every load; never patched in place.
#[derive(Debug, Clone)]
pub struct Session {
    pub source_label: String,
    /// Typed table with outliers removed.
    pub table: TimeSeriesTable,
    /// `None` when filtering left no rows.
    pub envelope: Option<Envelope>,
    /// Rows dropped by the outlier filter.
    pub removed_rows: usize,
}

impl Session {
    pub fn load(source: &InputSource, options: &LoadOptions) -> Result<Self> {
        load_with_preview(source, options).1
    }

    /// Build a session from already-parsed cells.
    pub fn from_raw(source_label: String, raw: &RawTable, options: &LoadOptions) -> Result<Self> {
        let (date_column, time_column) = options.resolve_columns(raw)?;
        let table = normalize(raw, &date_column, &time_column).context("reading timestamps and channels")?;

        let before = table.len();
        let table = filter_all(table, options.fence_mode);
        let removed_rows = before - table.len();

        let envelope = match compute_envelope(&table) {
            Ok(env) => Some(env),
            Err(e) => {
                log::warn!("No envelope for {source_label}: {e}");
                None
            }
        };

        log::info!(
            "Loaded {} ({} rows, {} channels, {} outlier rows removed)",
            source_label,
            table.len(),
            table.channels().len(),
            removed_rows
        );

        Ok(Session {
            source_label,
            table,
            envelope,
            removed_rows,
        })
    }
}

/// Parse `source` and build a session from it.
///
/// The parsed cells come back even when a later stage fails, so the table
/// preview and column pickers always describe the current input.
pub fn load_with_preview(source: &InputSource, options: &LoadOptions) -> (Option<RawTable>, Result<Session>) {
    let text = match source.text() {
        Ok(text) => text,
        Err(e) => return (None, Err(e)),
    };
    match parse(&text, &options.parse).context("parsing table") {
        Ok(raw) => {
            let session = Session::from_raw(source.label(), &raw, options);
            (Some(raw), session)
        }
        Err(e) => (None, Err(e)),
    }
}

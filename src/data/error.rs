use thiserror::Error;

/// Validation failures raised by the data pipeline.
///
/// All of them are deterministic: the only recovery is corrected input or
/// different load options.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no rows available")]
    EmptyTable,

    #[error("row {row} (line {line}) has {found} cells, expected {expected}")]
    MalformedRow {
        /// Index among the rows kept after skipping.
        row: usize,
        /// 1-based line number in the source text.
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{context}: '{value}' is not a valid MM/DD/YYYY HH:MM:SS timestamp")]
    TimestampParse { context: String, value: String },

    #[error("column '{column}', row {row}: '{value}' is not a number")]
    ChannelType {
        column: String,
        row: usize,
        value: String,
    },

    #[error("column '{name}' not found")]
    MissingColumn { name: String },

    #[error("no channel columns left after the date and time columns")]
    NoChannels,

    #[error("reading delimited text: {0}")]
    Csv(#[from] csv::Error),
}

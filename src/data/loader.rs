use std::borrow::Cow;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::error::DataError;
use super::outlier::FenceMode;
use super::raw::{ParseOptions, RawTable};

// ---------------------------------------------------------------------------
// Input sources
// ---------------------------------------------------------------------------

/// Where a dataset comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    /// A CSV file shipped with the application, read on every load.
    Bundled(PathBuf),
    /// Text the user picked; kept in memory so option changes re-parse it.
    Upload { name: String, text: String },
}

impl InputSource {
    /// Read a user-picked file into an upload.
    pub fn upload_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(InputSource::Upload { name, text })
    }

    /// Short name for the UI.
    pub fn label(&self) -> String {
        match self {
            InputSource::Bundled(path) => format!("sample: {}", path.display()),
            InputSource::Upload { name, .. } => name.clone(),
        }
    }

    /// The decoded text of the source.
    pub fn text(&self) -> Result<Cow<'_, str>> {
        match self {
            InputSource::Bundled(path) => std::fs::read_to_string(path)
                .map(Cow::Owned)
                .with_context(|| format!("reading bundled sample {}", path.display())),
            InputSource::Upload { text, .. } => Ok(Cow::Borrowed(text)),
        }
    }
}

// ---------------------------------------------------------------------------
// Load options
// ---------------------------------------------------------------------------

/// Header names looked for when no date/time column is configured.
pub const DEFAULT_DATE_COLUMN: &str = "Date";
pub const DEFAULT_TIME_COLUMN: &str = "Time";

/// Everything that controls how a source becomes a filtered table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    #[serde(flatten)]
    pub parse: ParseOptions,
    /// Column identifier of the date; see [`LoadOptions::resolve_columns`].
    pub date_column: Option<String>,
    pub time_column: Option<String>,
    pub fence_mode: FenceMode,
}

impl LoadOptions {
    /// Layout of the bundled sample: three preamble rows, then a header.
    pub fn bundled_sample() -> Self {
        LoadOptions {
            parse: ParseOptions {
                skip_rows: 3,
                skip_cols: 0,
                has_header: true,
            },
            ..Default::default()
        }
    }

    /// Names of the date and time columns in `raw`.
    ///
    /// Configured names win. Otherwise `Date`/`Time` are used when the
    /// header has them, falling back to the first and second column.
    pub fn resolve_columns(&self, raw: &RawTable) -> Result<(String, String), DataError> {
        let pick = |configured: &Option<String>, preferred: &str, fallback: usize| {
            if let Some(name) = configured {
                return Ok(name.clone());
            }
            if raw.column_index(preferred).is_some() {
                return Ok(preferred.to_string());
            }
            raw.columns
                .get(fallback)
                .cloned()
                .ok_or_else(|| DataError::MissingColumn { name: preferred.to_string() })
        };
        Ok((
            pick(&self.date_column, DEFAULT_DATE_COLUMN, 0)?,
            pick(&self.time_column, DEFAULT_TIME_COLUMN, 1)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::raw::parse;

    #[test]
    fn columns_resolve_from_header_or_position() {
        let opts = LoadOptions::default();
        let headerless = parse("01/01/2000,00:00:00,1", &ParseOptions::default()).unwrap();
        assert_eq!(
            opts.resolve_columns(&headerless).unwrap(),
            ("col0".to_string(), "col1".to_string())
        );

        let named = parse(
            "T1,Time,Date\n1,00:00:00,01/01/2000",
            &ParseOptions { has_header: true, ..Default::default() },
        )
        .unwrap();
        assert_eq!(
            opts.resolve_columns(&named).unwrap(),
            ("Date".to_string(), "Time".to_string())
        );

        let configured = LoadOptions { date_column: Some("T1".into()), ..Default::default() };
        assert_eq!(configured.resolve_columns(&named).unwrap().0, "T1");
    }

    #[test]
    fn single_column_cannot_hold_time() {
        let raw = parse("01/01/2000", &ParseOptions::default()).unwrap();
        assert!(matches!(
            LoadOptions::default().resolve_columns(&raw),
            Err(DataError::MissingColumn { .. })
        ));
    }

    #[test]
    fn options_deserialize_flat_with_defaults() {
        let opts: LoadOptions =
            serde_json::from_str(r#"{"skip_rows": 3, "has_header": true, "fence_mode": "original"}"#).unwrap();
        assert_eq!(opts.parse.skip_rows, 3);
        assert_eq!(opts.parse.skip_cols, 0);
        assert!(opts.parse.has_header);
        assert_eq!(opts.fence_mode, FenceMode::Original);
        assert_eq!(opts.date_column, None);
    }

    #[test]
    fn upload_label_is_the_file_name() {
        let src = InputSource::Upload { name: "x.csv".into(), text: "1,2".into() };
        assert_eq!(src.label(), "x.csv");
        assert_eq!(src.text().unwrap(), "1,2");
    }
}

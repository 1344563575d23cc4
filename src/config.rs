use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::LoadOptions;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "PERMAPORTAL_CONFIG";

/// Viewer settings; every field has a default so partial files work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Sample dataset offered without an upload.
    pub sample_path: PathBuf,
    pub sample_options: LoadOptions,
    /// Options applied to freshly uploaded files.
    pub upload_options: LoadOptions,
    /// Initial time-series window, `MM/DD/YYYY`.
    pub start_date: String,
    pub end_date: String,
    /// Temperature axis of the depth-profile chart.
    pub profile_range: [f64; 2],
    /// Rows shown in the raw table preview.
    pub preview_rows: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            sample_path: PathBuf::from("assets/sample_data/Sample_Data_Set.csv"),
            sample_options: LoadOptions::bundled_sample(),
            upload_options: LoadOptions::default(),
            start_date: "09/25/1999".to_string(),
            end_date: "08/29/2010".to_string(),
            profile_range: [-30.0, 15.0],
            preview_rows: 20,
        }
    }
}

impl ViewerConfig {
    /// Read the file named by `PERMAPORTAL_CONFIG`, or use the defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Using config {}", path.display());
        Ok(config)
    }
}

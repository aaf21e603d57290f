use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Export defaults taken from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Directory export files are written to
    pub output_dir: PathBuf,
    /// Export in batch-scan mode unless the command line says otherwise
    pub batch: bool,
}

impl ExportSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings = Self {
            output_dir: lookup("SCAN_EXPORT_OUTPUT_DIR")
                .unwrap_or_else(|| ".".to_string())
                .into(),
            batch: lookup("SCAN_EXPORT_BATCH")
                .unwrap_or_else(|| "false".to_string())
                .trim()
                .parse()
                .context("SCAN_EXPORT_BATCH must be true or false")?,
        };
        Ok(settings)
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ExportResult;

/// Destination of a finished export file.
pub trait ExportSink {
    /// Hand over the complete file contents under `filename`.
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> ExportResult<()>;
}

/// Writes exports into a directory, creating it when missing.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `filename` ends up.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl ExportSink for FileSink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> ExportResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(filename);
        fs::write(&path, bytes)?;
        tracing::debug!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

/// Keeps the last delivered file in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    last: Option<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filename(&self) -> Option<&str> {
        self.last.as_ref().map(|(name, _)| name.as_str())
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        self.last.as_ref().map(|(_, bytes)| bytes.as_slice())
    }

    /// Delivered contents as text, without the byte-order mark.
    pub fn text(&self) -> Option<String> {
        let bytes = self.bytes()?;
        let text = String::from_utf8_lossy(bytes);
        Some(text.trim_start_matches('\u{feff}').to_string())
    }
}

impl ExportSink for MemorySink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> ExportResult<()> {
        self.last = Some((filename.to_string(), bytes.to_vec()));
        Ok(())
    }
}

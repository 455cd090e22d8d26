use crate::error::SnapshotError;
use crate::results::RateRecord;
use std::fs;
use std::path::{Path, PathBuf};

/// Persists the latest [`RateRecord`] as a single JSON file
///
/// Every write replaces the file completely. The record is written to a
/// sibling temporary file first and renamed over the target, so a reader
/// sees either the old snapshot or the new one.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pretty-printed JSON for a record, exactly as written to disk
    pub fn render(record: &RateRecord) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(record)?)
    }

    /// Replace the snapshot with `record`
    pub fn write(&self, record: &RateRecord) -> Result<(), SnapshotError> {
        let json = Self::render(record)?;
        let tmp = self.temp_path();

        if let Err(source) = fs::write(&tmp, json.as_bytes()) {
            let _ = fs::remove_file(&tmp);
            return Err(self.io_err(&tmp, source));
        }

        if let Err(source) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(self.io_err(&self.path, source));
        }

        ::log::info!("Saved snapshot to {}", self.path.display());
        Ok(())
    }

    /// Read the current snapshot back, if one exists
    pub fn read(&self) -> Result<Option<RateRecord>, SnapshotError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(self.io_err(&self.path, source)),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_err(&self, path: &Path, source: std::io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

//! Delivery of rendered reports.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid export filename '{0}'")]
    InvalidFilename(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Receives a finished text artifact under a domain-chosen filename.
pub trait ExportSink {
    /// Returns where the artifact ended up.
    fn export(
        &self,
        filename: &str,
        content: &str,
    ) -> Result<PathBuf, ExportError>;
}

/// Rejects empty names, path separators and relative components so an
/// artifact can only land directly inside the sink's directory.
fn validate_filename(filename: &str) -> Result<(), ExportError> {
    let invalid = filename.trim().is_empty()
        || filename.contains(['/', '\\'])
        || filename == "."
        || filename == "..";
    if invalid {
        return Err(ExportError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> ExportError {
    let path = path.to_path_buf();
    move |source| ExportError::Io { path, source }
}

/// Writes artifacts into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectoryExportSink {
    dir: PathBuf,
}

impl DirectoryExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirectoryExportSink {
    fn export(
        &self,
        filename: &str,
        content: &str,
    ) -> Result<PathBuf, ExportError> {
        validate_filename(filename)?;

        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

        let path = self.dir.join(filename);
        let tmp_path = self.dir.join(format!(".{filename}.tmp"));
        fs::write(&tmp_path, content).map_err(io_err(&tmp_path))?;
        fs::rename(&tmp_path, &path).map_err(io_err(&path))?;

        tracing::info!(path = %path.display(), bytes = content.len(), "report exported");
        Ok(path)
    }
}

/// Keeps artifacts in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryExportSink {
    artifacts: Arc<Mutex<Vec<(String, String)>>>,
}

impl MemoryExportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(filename, content)` pair exported so far, oldest first.
    pub fn artifacts(&self) -> Vec<(String, String)> {
        self.artifacts
            .lock()
            .map(|a| a.clone())
            .unwrap_or_default()
    }
}

impl ExportSink for MemoryExportSink {
    fn export(
        &self,
        filename: &str,
        content: &str,
    ) -> Result<PathBuf, ExportError> {
        validate_filename(filename)?;
        if let Ok(mut artifacts) = self.artifacts.lock() {
            artifacts.push((filename.to_string(), content.to_string()));
        }
        Ok(PathBuf::from(filename))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectoryExportSink::new(dir.path().join("reports"));

        let path = sink.export("total_estimation.txt", "hello").unwrap();

        assert_eq!(path, dir.path().join("reports").join("total_estimation.txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn directory_sink_overwrites_previous_export() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectoryExportSink::new(dir.path());

        sink.export("a.txt", "first").unwrap();
        let path = sink.export("a.txt", "second").unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn unrelated_tmp_file_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.tmp"), "keep me").unwrap();
        let sink = DirectoryExportSink::new(dir.path());

        sink.export("a.txt", "report").unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("a.tmp")).unwrap(), "keep me");
        assert!(!dir.path().join(".a.txt.tmp").exists());
    }

    #[test]
    fn path_separators_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectoryExportSink::new(dir.path());

        for name in ["../escape.txt", "a/b.txt", "a\\b.txt", "..", "  "] {
            assert!(
                matches!(sink.export(name, "x"), Err(ExportError::InvalidFilename(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn memory_sink_records_artifacts_in_order() {
        let sink = MemoryExportSink::new();
        let handle = sink.clone();

        sink.export("one.txt", "1").unwrap();
        sink.export("two.txt", "2").unwrap();

        assert_eq!(
            handle.artifacts(),
            vec![
                ("one.txt".to_string(), "1".to_string()),
                ("two.txt".to_string(), "2".to_string()),
            ]
        );
    }
}

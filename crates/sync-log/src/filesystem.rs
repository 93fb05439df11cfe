//! Filesystem-based sync log storage implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::store::SyncLogStore;
use crate::SyncLogEntry;

/// Filesystem implementation of SyncLogStore trait.
///
/// Stores the entry as a small JSON file. Writes go to a temporary file in
/// the same directory which is then renamed over the target, so readers
/// never observe a half-written entry.
#[derive(Debug, Clone)]
pub struct FilesystemStore {
    path: PathBuf,
}

impl FilesystemStore {
    /// Create a new FilesystemStore writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

#[async_trait]
impl SyncLogStore for FilesystemStore {
    async fn write(&self, entry: &SyncLogEntry) -> Result<()> {
        let dir = self.parent_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create sync log directory {}", dir.display()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(serde_json::to_string_pretty(entry)?.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to replace sync log {}", self.path.display()))?;

        tracing::debug!(
            "Wrote sync log {}: {} at {}",
            self.path.display(),
            entry.status,
            entry.last_sync
        );
        Ok(())
    }

    async fn read(&self) -> Result<Option<SyncLogEntry>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read sync log {}", self.path.display()))?;
        let entry = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse sync log {}", self.path.display()))?;
        Ok(Some(entry))
    }
}

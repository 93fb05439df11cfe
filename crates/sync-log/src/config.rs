//! Sync log location.

use std::path::{Path, PathBuf};

/// File name used when the log sits next to the local store.
pub const DEFAULT_FILE_NAME: &str = "sync_log.json";

/// Where the sync log for a local store file lives: the same directory,
/// named [`DEFAULT_FILE_NAME`].
pub fn log_path_for(local_store: &Path) -> PathBuf {
    match local_store.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(DEFAULT_FILE_NAME),
        _ => PathBuf::from(DEFAULT_FILE_NAME),
    }
}

//! Sync log storage trait.

use anyhow::Result;
use async_trait::async_trait;

use crate::SyncLogEntry;

/// Trait for sync log storage operations.
///
/// A store holds at most one entry; every write replaces it.
#[async_trait]
pub trait SyncLogStore: Send + Sync {
    /// Replace the stored entry.
    async fn write(&self, entry: &SyncLogEntry) -> Result<()>;

    /// Read the stored entry.
    ///
    /// Returns None if nothing has been written yet.
    async fn read(&self) -> Result<Option<SyncLogEntry>>;
}

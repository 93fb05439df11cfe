//! Failure taxonomy of a sync run.
//!
//! None of these escape [`SyncManager::sync_now`](crate::SyncManager::sync_now);
//! each is rendered into the run's error list.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or invalid connection string, or a table that cannot be
    /// planned. Disables sync or skips one table.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A store could not be opened at the start of a run.
    #[error("connection failure: {0}")]
    ConnectionFailure(String),

    /// One row failed and was rolled back.
    #[error("{table}: {cause}")]
    RowSync { table: String, cause: String },

    /// Another run holds the manager.
    #[error("sync already in progress")]
    ConcurrentRunRejected,
}

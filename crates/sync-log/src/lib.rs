//! Sync log for dual-sync.
//!
//! Records the time and outcome of the most recent synchronization run.
//! The log is a single entry, overwritten at the start of every run
//! (`in_progress`) and again at its end (`completed`,
//! `completed_with_errors` or `failed`). It is never appended to.
//!
//! # Architecture
//!
//! - [`SyncLogEntry`] - the persisted `{ last_sync, status }` document
//! - [`SyncStatus`] - run outcome
//! - [`SyncLogStore`] - storage trait
//!
//! ## Storage Backends
//!
//! - [`FilesystemStore`] - JSON file co-located with the local store

mod config;
mod entry;
mod filesystem;
mod status;
pub mod store;


pub use config::{log_path_for, DEFAULT_FILE_NAME};
pub use entry::SyncLogEntry;
pub use filesystem::FilesystemStore;
pub use status::SyncStatus;
pub use store::SyncLogStore;

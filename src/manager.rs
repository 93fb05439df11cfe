//! Sync manager: orchestrates one run across every table.

use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use sync_core::{Direction, Leg, TableDescriptor};
use sync_log::{SyncLogEntry, SyncLogStore, SyncStatus};
use tracing::{info, warn};

use crate::error::SyncError;
use crate::result::SyncResult;
use crate::store::{StoreAdapter, StoreConnector, StoreError};
use crate::strategy::sync_table;
use crate::tables::TableSet;

/// Progress callback: `(label, percent)` after each table and leg.
pub type Progress<'a> = &'a (dyn Fn(&str, u8) + Send + Sync);

/// Holds the running flag for the duration of a run.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns both store connectors, the table set and the sync log.
///
/// At most one run executes at a time; overlapping calls to
/// [`sync_now`](Self::sync_now) are rejected rather than queued.
pub struct SyncManager {
    local: Box<dyn StoreConnector>,
    remote: Option<Box<dyn StoreConnector>>,
    tables: TableSet,
    log: Box<dyn SyncLogStore>,
    last_entry: Option<SyncLogEntry>,
    syncing: AtomicBool,
}

impl SyncManager {
    /// Create a manager and read the previous run from the sync log.
    ///
    /// `remote` is `None` when no usable connection string was configured;
    /// every run is then refused with a configuration error.
    pub async fn new(
        local: Box<dyn StoreConnector>,
        remote: Option<Box<dyn StoreConnector>>,
        tables: TableSet,
        log: Box<dyn SyncLogStore>,
    ) -> Self {
        let last_entry = match log.read().await {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Ignoring unreadable sync log: {e:#}");
                None
            }
        };
        if let Some(entry) = &last_entry {
            info!("Last sync: {} ({})", entry.last_sync, entry.status);
        }

        Self {
            local,
            remote,
            tables,
            log,
            last_entry,
            syncing: AtomicBool::new(false),
        }
    }

    /// The sync log entry read at construction.
    pub fn last_sync(&self) -> Option<&SyncLogEntry> {
        self.last_entry.as_ref()
    }

    pub fn time_since_last_sync(&self) -> Option<chrono::Duration> {
        self.last_entry
            .as_ref()
            .and_then(|entry| entry.elapsed_since(Utc::now()))
    }

    pub fn remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    pub fn tables(&self) -> &TableSet {
        &self.tables
    }

    /// Run one sync in `direction`.
    ///
    /// Never fails: every problem is reported in the returned result.
    pub async fn sync_now(&self, direction: Direction, progress: Option<Progress<'_>>) -> SyncResult {
        let Some(remote) = self.remote.as_deref() else {
            return SyncResult::rejected(
                direction,
                SyncError::Configuration("remote sync is disabled".to_string()),
            );
        };
        let Some(_guard) = RunGuard::acquire(&self.syncing) else {
            info!("Sync requested while another run is active; rejected");
            return SyncResult::rejected(direction, SyncError::ConcurrentRunRejected);
        };

        info!("Starting sync ({direction})");
        self.write_log(SyncStatus::InProgress).await;
        let mut result = SyncResult::new(direction);

        let mut local = match self.local.open().await {
            Ok(adapter) => adapter,
            Err(e) => return self.connection_failed(result, e).await,
        };
        let mut remote = match remote.open().await {
            Ok(adapter) => adapter,
            Err(e) => {
                close(local).await;
                return self.connection_failed(result, e).await;
            }
        };

        let mut steps: Vec<(&TableDescriptor, Leg)> = Vec::new();
        for table in self.tables.iter() {
            if let Err(e) = table.validate() {
                warn!("Skipping {}: {e}", table.name);
                result.errors.push(format!(
                    "{}: {}",
                    table.name,
                    SyncError::Configuration(e.to_string())
                ));
                continue;
            }
            for leg in direction.legs() {
                if table.runs_on(*leg) {
                    steps.push((table, *leg));
                }
            }
        }

        let total = steps.len();
        for (done, (table, leg)) in steps.into_iter().enumerate() {
            let (source, destination) = match leg {
                Leg::Push => (local.as_mut(), remote.as_mut()),
                Leg::Pull => (remote.as_mut(), local.as_mut()),
            };
            let outcome = sync_table(table, leg, source, destination).await;

            result.records_synced += outcome.records_synced();
            result.errors.extend(outcome.errors);
            if outcome.completed && !result.tables_synced.contains(&table.name) {
                result.tables_synced.push(table.name.clone());
            }

            if let Some(progress) = progress {
                let percent = ((done + 1) * 100 / total) as u8;
                progress(&format!("{} ({})", table.name, leg.arrow()), percent);
            }
        }

        close(local).await;
        close(remote).await;

        let result = result.finish();
        let status = if result.success {
            SyncStatus::Completed
        } else {
            SyncStatus::CompletedWithErrors
        };
        self.write_log(status).await;
        info!("{}", result.summary());
        result
    }

    /// Release process-wide store resources.
    pub async fn shutdown(&self) {
        if let Some(remote) = &self.remote {
            remote.shutdown().await;
        }
        self.local.shutdown().await;
    }

    async fn connection_failed(&self, mut result: SyncResult, error: StoreError) -> SyncResult {
        warn!("Sync aborted: {error}");
        result
            .errors
            .push(SyncError::ConnectionFailure(error.to_string()).to_string());
        self.write_log(SyncStatus::Failed).await;
        result.finish()
    }

    async fn write_log(&self, status: SyncStatus) {
        if let Err(e) = self.log.write(&SyncLogEntry::now(status)).await {
            warn!("Failed to write sync log ({status}): {e:#}");
        }
    }
}

async fn close(adapter: Box<dyn StoreAdapter>) {
    let label = adapter.label().to_string();
    if let Err(e) = adapter.close().await {
        warn!("Failed to close {label} store: {e}");
    }
}

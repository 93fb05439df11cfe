//! Periodic background sync.

use std::sync::Arc;
use std::time::Duration;
use sync_core::Direction;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::manager::SyncManager;
use crate::result::SyncResult;

/// Runs a bidirectional sync every `interval`, forever.
///
/// A tick that lands while another run is active is rejected by the manager
/// and simply logged; the next tick tries again.
pub struct AutoSyncDaemon {
    manager: Arc<SyncManager>,
    interval: Duration,
}

impl AutoSyncDaemon {
    pub fn new(manager: Arc<SyncManager>, interval: Duration) -> Self {
        Self { manager, interval }
    }

    /// Sleep one interval, then sync in both directions.
    pub async fn tick(&self) -> SyncResult {
        tokio::time::sleep(self.interval).await;
        let result = self.manager.sync_now(Direction::Both, None).await;
        if result.success {
            info!("Auto-sync: {}", result.summary());
        } else {
            warn!("Auto-sync: {}", result.summary());
        }
        result
    }

    pub async fn run(&self) {
        info!("Auto-sync every {}s", self.interval.as_secs());
        loop {
            self.tick().await;
        }
    }

    /// Run the loop on its own task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }
}

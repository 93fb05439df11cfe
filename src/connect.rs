//! Build a [`SyncManager`] from command-line options.

use sync_log::{log_path_for, FilesystemStore};
use tracing::{info, warn};

use crate::config::{sanitize_connection_string, RemoteConfig};
use crate::manager::SyncManager;
use crate::store::{LocalStore, RemoteStore, StoreConnector};
use crate::tables::TableSet;
use crate::StoreOpts;

/// Remote connector for the configured connection string.
///
/// Returns `None`, after logging why, when the string is absent or cannot be
/// parsed. The engine then runs without remote sync.
pub fn remote_connector(opts: &StoreOpts) -> Option<RemoteStore> {
    let raw = match opts.remote_url.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => {
            warn!("No remote connection string configured; remote sync disabled");
            return None;
        }
    };

    match RemoteConfig::parse(raw) {
        Ok(config) => {
            info!("Remote store: {}", config.redacted());
            Some(RemoteStore::new(&config, opts.connect_timeout))
        }
        Err(e) => {
            warn!(
                "Invalid remote connection string '{}': {e}; remote sync disabled",
                sanitize_connection_string(raw)
            );
            None
        }
    }
}

/// Wire up the local store, the remote store (if configured) and the sync log.
pub async fn build_manager(opts: &StoreOpts, tables: TableSet) -> SyncManager {
    let log_path = opts
        .sync_log
        .clone()
        .unwrap_or_else(|| log_path_for(&opts.local_db));
    info!(
        "Local store: {} (sync log {})",
        opts.local_db.display(),
        log_path.display()
    );

    let remote = remote_connector(opts).map(|r| Box::new(r) as Box<dyn StoreConnector>);
    SyncManager::new(
        Box::new(LocalStore::new(&opts.local_db)),
        remote,
        tables,
        Box::new(FilesystemStore::new(log_path)),
    )
    .await
}

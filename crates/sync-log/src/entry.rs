//! The single persisted sync log entry.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SyncStatus;

/// Latest sync run, as stored on disk.
///
/// # File Format
///
/// ```json
/// {
///     "last_sync": "2024-01-01T00:00:00.000000",
///     "status": "completed"
/// }
/// ```
///
/// `last_sync` is kept as a string so that files written by other tools with
/// slightly different ISO-8601 flavours still load; use
/// [`SyncLogEntry::last_sync_at`] to interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncLogEntry {
    /// Time the entry was written (UTC, ISO-8601)
    pub last_sync: String,
    /// Run status at that time
    pub status: SyncStatus,
}

impl SyncLogEntry {
    /// Create an entry stamped with the current time.
    pub fn now(status: SyncStatus) -> Self {
        Self::at(Utc::now(), status)
    }

    /// Create an entry stamped with `at`.
    pub fn at(at: DateTime<Utc>, status: SyncStatus) -> Self {
        Self {
            last_sync: at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            status,
        }
    }

    /// Parse `last_sync`.
    ///
    /// Accepts RFC 3339 (with offset) as well as naive
    /// `YYYY-MM-DDTHH:MM:SS[.f]` / `YYYY-MM-DD HH:MM:SS[.f]`, which are read
    /// as UTC. Returns `None` for anything else.
    pub fn last_sync_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_sync.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    /// Time elapsed between `last_sync` and `now`.
    pub fn elapsed_since(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        self.last_sync_at().map(|at| now - at)
    }
}
